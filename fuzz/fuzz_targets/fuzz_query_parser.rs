#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Any input either parses or yields a query error, never a panic
    if let Ok(query) = boolsearch::query::parse_query(data) {
        let _ = query.to_string();
        let _ = query.terms();
    }
});
