//! Set operations over sorted posting lists.
//!
//! Every input must be ascending and duplicate-free. This is not checked:
//! unsorted input gives a wrong answer, never a panic.

use crate::index::types::DocId;

/// Documents present in both lists. Linear two-pointer merge.
pub fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(a[i]);
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            i += 1;
        } else {
            j += 1;
        }
    }

    out
}

/// Documents present in either list.
pub fn union(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(a[i]);
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else {
            out.push(b[j]);
            j += 1;
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);

    out.dedup();
    out
}

/// Documents of `universe` not present in `a`.
///
/// Walks the whole universe, so the cost is `O(|universe| + |a|)` however
/// selective `a` is.
pub fn difference(universe: &[DocId], a: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(universe.len());
    let (mut i, mut j) = (0, 0);

    while i < universe.len() && j < a.len() {
        if universe[i] == a[j] {
            i += 1;
            j += 1;
        } else if universe[i] < a[j] {
            out.push(universe[i]);
            i += 1;
        } else {
            j += 1;
        }
    }
    out.extend_from_slice(&universe[i..]);

    out
}

/// Materialize `[1..=max_doc]`
pub fn universe(max_doc: DocId) -> Vec<DocId> {
    (1..=max_doc).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Deterministic pseudo-random sorted sets for property checks
    fn sample_sets(seed: u64, count: usize, max: u32) -> Vec<Vec<DocId>> {
        let mut state = seed;
        let mut next = move || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 33) as u32
        };

        (0..count)
            .map(|_| {
                let len = next() % 40;
                let set: BTreeSet<DocId> = (0..len).map(|_| next() % max + 1).collect();
                set.into_iter().collect()
            })
            .collect()
    }

    fn as_set(v: &[DocId]) -> BTreeSet<DocId> {
        v.iter().copied().collect()
    }

    fn is_strictly_ascending(v: &[DocId]) -> bool {
        v.windows(2).all(|w| w[0] < w[1])
    }

    #[test]
    fn test_intersect_basic() {
        assert_eq!(intersect(&[1, 2, 3], &[2, 3, 4]), vec![2, 3]);
        assert_eq!(intersect(&[1, 5], &[2, 6]), Vec::<DocId>::new());
        assert!(intersect(&[], &[1, 2]).is_empty());
    }

    #[test]
    fn test_union_basic() {
        assert_eq!(union(&[1, 2, 3], &[2, 3, 4]), vec![1, 2, 3, 4]);
        assert_eq!(union(&[], &[7]), vec![7]);
        assert_eq!(union(&[9], &[]), vec![9]);
    }

    #[test]
    fn test_difference_basic() {
        let u = universe(4);
        assert_eq!(difference(&u, &[1, 2, 3]), vec![4]);
        assert_eq!(difference(&u, &[]), vec![1, 2, 3, 4]);
        assert!(difference(&u, &u).is_empty());
    }

    #[test]
    fn test_difference_ignores_ids_outside_universe() {
        let u = universe(3);
        assert_eq!(difference(&u, &[2, 10, 11]), vec![1, 3]);
    }

    #[test]
    fn test_universe() {
        assert_eq!(universe(3), vec![1, 2, 3]);
        assert!(universe(0).is_empty());
    }

    #[test]
    fn test_operations_match_set_semantics() {
        let sets = sample_sets(42, 30, 60);
        let u = universe(60);

        for a in &sets {
            for b in &sets {
                let and = intersect(a, b);
                let or = union(a, b);
                assert!(is_strictly_ascending(&and));
                assert!(is_strictly_ascending(&or));
                assert_eq!(as_set(&and), as_set(a).intersection(&as_set(b)).copied().collect());
                assert_eq!(as_set(&or), as_set(a).union(&as_set(b)).copied().collect());
            }

            let not = difference(&u, a);
            assert!(is_strictly_ascending(&not));
            assert_eq!(as_set(&not), as_set(&u).difference(&as_set(a)).copied().collect());
        }
    }

    #[test]
    fn test_identities() {
        let u = universe(60);
        for a in sample_sets(7, 20, 60) {
            assert_eq!(intersect(&a, &a), a);
            assert_eq!(union(&a, &a), a);
            assert_eq!(difference(&u, &difference(&u, &a)), a);
        }
    }
}
