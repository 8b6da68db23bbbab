/// One-shot TCP exchange with a WS980WiFi station
use std::io;
use std::time::Duration;

use log::debug;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};

use crate::error::TransportError;
use crate::utils::format_frame;

/// The station's fixed "get current readings" command.
pub const GET_ACTUALS: [u8; 8] = [0xFF, 0xFF, 0x0B, 0x00, 0x06, 0x04, 0x04, 0x19];

/// The station firmware needs a short pause between receiving a command and
/// answering it; reading immediately returns empty or partial data.
const TURNAROUND_DELAY: Duration = Duration::from_millis(100);

/// Upper bound for a single response read. The whole reply fits in one read.
const RECV_BUFFER_SIZE: usize = 1024;

/// Send one request to `host:port` and return the raw response bytes.
///
/// Opens a fresh connection per call and closes it on every exit path. No
/// retries are attempted here; the poll scheduler owns that policy.
pub async fn exchange(
    host: &str,
    port: u16,
    request: &[u8],
    deadline: Duration,
) -> Result<Vec<u8>, TransportError> {
    let addr = format!("{}:{}", host, port);

    debug!("sending {} to {}", format_frame(request), addr);

    let mut stream = timeout(deadline, TcpStream::connect(&addr))
        .await
        .map_err(|_| TransportError::Connection {
            addr: addr.clone(),
            source: io::Error::new(io::ErrorKind::TimedOut, "connect timed out"),
        })?
        .map_err(|e| TransportError::Connection {
            addr: addr.clone(),
            source: e,
        })?;

    stream
        .write_all(request)
        .await
        .map_err(|e| TransportError::Socket {
            addr: addr.clone(),
            source: e,
        })?;

    sleep(TURNAROUND_DELAY).await;

    debug!("receiving...");
    let mut buf = vec![0u8; RECV_BUFFER_SIZE];
    let n = timeout(deadline, stream.read(&mut buf))
        .await
        .map_err(|_| TransportError::Timeout {
            addr: addr.clone(),
            timeout: deadline,
        })?
        .map_err(|e| TransportError::Socket {
            addr: addr.clone(),
            source: e,
        })?;
    buf.truncate(n);

    debug!("received {}", format_frame(&buf));
    Ok(buf)
}
