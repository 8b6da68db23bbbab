/// Frame validation for WS980WiFi "get actuals" responses
///
/// A response frame is at least 82 bytes:
///
/// ```text
/// +-----------+---------------------+----------+----------+
/// | header    | payload             | sum A    | sum B    |
/// | [0..6)    | [6..80)             | byte 80  | byte 81  |
/// +-----------+---------------------+----------+----------+
/// ```
///
/// Byte 80 is the rolling sum over bytes [5, 80); byte 81 is the rolling sum
/// over bytes [2, 81), which covers the inner sum byte as well. Both sums are
/// taken modulo 256. A frame is only trusted when both match.
use crate::error::FrameError;

/// Minimum length of a valid response frame.
pub const MIN_FRAME_LEN: usize = 82;

/// Payload region of a validated frame.
pub const PAYLOAD_RANGE: std::ops::Range<usize> = 6..80;

// (start, end, trailer index) for the two checksum ranges, end-exclusive
const CHECKSUM_RANGES: [(usize, usize, usize); 2] = [(5, 80, 80), (2, 81, 81)];

fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
}

/// Validate a raw response frame and return its payload slice.
///
/// Checks the minimum length and both trailer checksums; a frame failing
/// either check is rejected whole, no partial decode is attempted.
pub fn validate_frame(raw: &[u8]) -> Result<&[u8], FrameError> {
    if raw.len() < MIN_FRAME_LEN {
        return Err(FrameError::TooShort {
            actual: raw.len(),
            min: MIN_FRAME_LEN,
        });
    }

    for (start, end, index) in CHECKSUM_RANGES {
        let computed = checksum(&raw[start..end]);
        if computed != raw[index] {
            return Err(FrameError::ChecksumMismatch {
                index,
                computed,
                stored: raw[index],
            });
        }
    }

    Ok(&raw[PAYLOAD_RANGE])
}
