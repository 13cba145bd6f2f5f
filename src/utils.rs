//! Utility functions.

/// Formats `data` as hex dump lines of 16 bytes, labelled from `base`.
pub fn hexdump(data: &[u8], base: u64) -> Vec<String> {
    data.chunks(16)
        .enumerate()
        .map(|(row, chunk)| {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
            let ascii: String = chunk
                .iter()
                .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
                .collect();
            format!("{:08x}  {:<47}  |{}|", base + (row as u64) * 16, hex.join(" "), ascii)
        })
        .collect()
}
