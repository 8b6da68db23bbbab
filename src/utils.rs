/// Utility functions for formatting log output
use time::{format_description, OffsetDateTime};

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    let format = format_description::parse("[day].[month].[year] - [hour]:[minute]:[second]")
        .expect("Failed to create format description");
    dt.format(&format).unwrap_or_else(|_| dt.to_string())
}

/// Render a raw frame as spaced hex bytes with its length, for debug logs.
pub fn format_frame(buf: &[u8]) -> String {
    if buf.is_empty() {
        return String::new();
    }
    let hex: Vec<String> = buf.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{} (len={})", hex.join(" "), buf.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_render_as_hex_with_length() {
        assert_eq!(format_frame(&[0xFF, 0x0B, 0x00]), "ff 0b 00 (len=3)");
        assert_eq!(format_frame(&[]), "");
    }
}
