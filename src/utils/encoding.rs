/// Append a posting list as fixed-width little-endian u32s
pub fn encode_postings(values: &[u32], buf: &mut Vec<u8>) {
    buf.reserve(values.len() * 4);
    for &value in values {
        buf.extend_from_slice(&value.to_le_bytes());
    }
}

/// Decode fixed-width little-endian u32s in storage order.
///
/// Trailing bytes that do not form a whole u32 are ignored.
pub fn decode_postings(buf: &[u8]) -> Vec<u32> {
    buf.chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}
