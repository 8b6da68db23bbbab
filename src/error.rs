//! Error types for the WS980WiFi station protocol and transport.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Socket-level faults while exchanging one request/response pair.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The station at host:port could not be reached.
    #[error("failed to connect to {addr}: {source}")]
    Connection { addr: String, source: io::Error },

    /// No response arrived within the configured deadline.
    #[error("no response from {addr} within {timeout:?}")]
    Timeout { addr: String, timeout: Duration },

    /// Any other socket fault after the connection was established.
    #[error("socket error while talking to {addr}: {source}")]
    Socket { addr: String, source: io::Error },
}

/// Integrity failures of a received frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The response is shorter than the 82-byte minimum frame.
    #[error("frame too short: got {actual} bytes, need at least {min}")]
    TooShort { actual: usize, min: usize },

    /// A computed rolling sum does not match the stored trailer byte.
    #[error("checksum mismatch at byte {index}: computed 0x{computed:02X}, stored 0x{stored:02X}")]
    ChecksumMismatch {
        index: usize,
        computed: u8,
        stored: u8,
    },
}

/// Conditions that invalidate an entire payload decode.
///
/// Field boundaries in the tag/value stream cannot be trusted past the first
/// bad tag, so any of these rejects the whole frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A tag byte with no entry in the observation catalog.
    #[error("no mapping for item id 0x{tag:02X} at payload index {index}")]
    UnknownTag { tag: u8, index: usize },

    /// A known tag whose value bytes run past the end of the payload.
    #[error("not enough bytes for {name}: need {width} at index {index}, payload is {len} bytes")]
    Truncated {
        name: &'static str,
        width: usize,
        index: usize,
        len: usize,
    },
}

/// Umbrella error for one complete poll cycle.
#[derive(Error, Debug)]
pub enum PollError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Configuration problems detected at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no weather stations configured; set WS980_STATIONS or WS980_STATION_<N>_HOST/_PORT")]
    NoStations,

    #[error("invalid station entry '{0}': expected name=host:port")]
    InvalidStation(String),

    #[error("invalid port '{0}': must be in 1..=65535")]
    InvalidPort(String),

    #[error("invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}
