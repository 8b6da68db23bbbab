/// Decoding of the tag/value observation stream in a validated payload
use std::collections::HashMap;

use log::debug;

use crate::error::DecodeError;
use crate::protocol::catalog::{self, ITEM_LIGHT};

/// One full set of decoded readings, keyed by canonical observation name.
///
/// `None` marks an observation the station reported but flagged as having no
/// data (sensor absent or invalid).
pub type WeatherData = HashMap<&'static str, Option<f64>>;

// The firmware reports this raw light value instead of the all-0xFF sentinel
// when the light sensor is invalid.
const LIGHT_INVALID_RAW: u32 = 0x00FF_FFFF;

/// Read a value field as a big-endian unsigned integer.
///
/// A field of all 0xFF bytes is the station's "no data" sentinel and yields
/// `None` for any item id.
fn decode_field(field: &[u8]) -> Option<u32> {
    if field.iter().all(|&b| b == 0xFF) {
        return None;
    }
    Some(field.iter().fold(0u32, |x, &b| (x << 8) | u32::from(b)))
}

/// Decode a validated payload into named readings.
///
/// The payload is a variable-length sequence of observations: an item id byte
/// followed by one to four value bytes, MSB first. We simply walk the slice,
/// decoding as we go. Decoding is all-or-nothing: an unknown item id or a
/// value field running past the end of the payload means field boundaries can
/// no longer be trusted, so the whole frame is rejected.
pub fn decode_observations(payload: &[u8]) -> Result<WeatherData, DecodeError> {
    let mut data = WeatherData::new();
    let mut i = 0;

    while i < payload.len() {
        let tag = payload[i];
        i += 1;

        let item = catalog::lookup(tag).ok_or(DecodeError::UnknownTag {
            tag,
            index: i - 1,
        })?;

        if i + item.width > payload.len() {
            return Err(DecodeError::Truncated {
                name: item.name,
                width: item.width,
                index: i,
                len: payload.len(),
            });
        }

        let field = &payload[i..i + item.width];
        i += item.width;

        let raw = decode_field(field);
        let mut value = raw.map(|x| item.scale.apply(x));

        // Firmware bug workaround: the light sensor reports 0xFFFFFF in its
        // 4-byte field when invalid, which the sentinel check cannot catch.
        // Compared on the raw integer, before scaling.
        if tag == ITEM_LIGHT && raw == Some(LIGHT_INVALID_RAW) {
            value = None;
        }

        debug!("{}: {:?} (0x{:02x})", item.name, value, tag);
        // Last write wins if the station ever repeats an item id
        data.insert(item.name, value);
    }

    Ok(data)
}
