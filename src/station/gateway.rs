/// Per-station gateway façade and the registry owning all configured stations
use std::collections::HashMap;
use std::time::Duration;

use log::{debug, warn};
use time::OffsetDateTime;

use crate::error::{PollError, TransportError};
use crate::protocol::{decode_observations, validate_frame, WeatherData};
use crate::station::transport::{self, GET_ACTUALS};

/// One configured weather station and the last readings received from it.
///
/// A gateway is either VALID (the last poll decoded cleanly and the cached
/// readings may be served) or INVALID (no trustworthy readings). Only
/// [`poll`](StationGateway::poll) moves between the two states.
#[derive(Debug)]
pub struct StationGateway {
    name: String,
    host: String,
    port: u16,
    timeout: Duration,
    weather_data: Option<WeatherData>,
    is_valid: bool,
    last_update: Option<OffsetDateTime>,
}

impl StationGateway {
    /// Create a gateway without touching the network.
    pub fn new(name: &str, host: &str, port: u16, timeout: Duration) -> Self {
        StationGateway {
            name: name.to_string(),
            host: host.to_string(),
            port,
            timeout,
            weather_data: None,
            is_valid: false,
            last_update: None,
        }
    }

    /// Create a gateway and run its first poll.
    ///
    /// A transport failure on the initial poll fails configuration outright;
    /// a bad checksum or undecodable payload only leaves the gateway in the
    /// INVALID state, since the station itself is clearly reachable.
    pub async fn configure(
        name: &str,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let mut gateway = StationGateway::new(name, host, port, timeout);
        match gateway.poll().await {
            Ok(()) => {}
            Err(PollError::Transport(e)) => return Err(e),
            Err(e) => warn!("{}: initial poll got no valid data: {}", name, e),
        }
        Ok(gateway)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether the last poll produced a full set of readings.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// When the last successful poll completed, if any.
    pub fn last_update(&self) -> Option<OffsetDateTime> {
        self.last_update
    }

    /// Run one exchange/validate/decode cycle and update the cache.
    ///
    /// On success the cached readings are replaced as a whole; on any failure
    /// the cache is cleared, the gateway goes INVALID, and the typed error is
    /// handed to the caller to decide retry policy.
    pub async fn poll(&mut self) -> Result<(), PollError> {
        match self.fetch().await {
            Ok(data) => {
                self.weather_data = Some(data);
                self.is_valid = true;
                self.last_update = Some(OffsetDateTime::now_utc());
                Ok(())
            }
            Err(e) => {
                self.weather_data = None;
                self.is_valid = false;
                Err(e)
            }
        }
    }

    async fn fetch(&self) -> Result<WeatherData, PollError> {
        let raw = transport::exchange(&self.host, self.port, &GET_ACTUALS, self.timeout).await?;
        let payload = validate_frame(&raw)?;
        let data = decode_observations(payload)?;
        debug!("{}: decoded {} observations", self.name, data.len());
        Ok(data)
    }

    /// Cached value for a named observation.
    ///
    /// `None` when the gateway is INVALID, the name was never reported, or
    /// the station marked the observation as having no data. Unknown names
    /// are not an error.
    pub fn get(&self, name: &str) -> Option<f64> {
        if !self.is_valid {
            return None;
        }
        self.weather_data.as_ref()?.get(name).copied().flatten()
    }
}

/// All configured stations, keyed by station name.
///
/// Owned by the poll loop; replaces any notion of process-global state.
#[derive(Debug, Default)]
pub struct StationRegistry {
    gateways: HashMap<String, StationGateway>,
}

impl StationRegistry {
    pub fn new() -> Self {
        StationRegistry {
            gateways: HashMap::new(),
        }
    }

    pub fn insert(&mut self, gateway: StationGateway) {
        self.gateways.insert(gateway.name().to_string(), gateway);
    }

    pub fn get(&self, name: &str) -> Option<&StationGateway> {
        self.gateways.get(name)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut StationGateway)> {
        self.gateways.iter_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }

    pub fn len(&self) -> usize {
        self.gateways.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn checksum(bytes: &[u8]) -> u8 {
        bytes.iter().fold(0u8, |sum, &b| sum.wrapping_add(b))
    }

    /// A 74-byte payload covering 21 of the 23 item ids, the mix a real
    /// station sends in one frame.
    fn sample_payload() -> Vec<u8> {
        let mut p = Vec::new();
        let two_byte: [(u8, u16); 11] = [
            (0x01, 215),   // in_temp 21.5
            (0x02, 200),   // out_temp 20.0
            (0x03, 150),   // dewpoint 15.0
            (0x04, 198),   // windchill 19.8
            (0x05, 210),   // heatindex 21.0
            (0x08, 10081), // abs_baro 1008.1
            (0x09, 10132), // rel_baro 1013.2
            (0x0A, 270),   // wind_dir 270
            (0x0B, 52),    // wind_speed 5.2
            (0x0C, 81),    // gust_speed 8.1
            (0x16, 1230),  // uv 1230
        ];
        for (tag, value) in two_byte {
            p.push(tag);
            p.extend_from_slice(&value.to_be_bytes());
        }
        let one_byte: [(u8, u8); 3] = [(0x06, 45), (0x07, 78), (0x17, 3)];
        for (tag, value) in one_byte {
            p.push(tag);
            p.push(value);
        }
        let four_byte: [(u8, u32); 7] = [
            (0x0D, 0),      // rain_event
            (0x0E, 0),      // rain_rate
            (0x10, 125),    // rain_day 12.5
            (0x11, 2310),   // rain_week 231.0
            (0x12, 4820),   // rain_month 482.0
            (0x13, 12040),  // rain_year 1204.0
            (0x15, 433700), // light 43370.0
        ];
        for (tag, value) in four_byte {
            p.push(tag);
            p.extend_from_slice(&value.to_be_bytes());
        }
        assert_eq!(p.len(), 74);
        p
    }

    fn build_frame(payload: &[u8]) -> Vec<u8> {
        let mut frame = vec![0xFF, 0xFF, 0x27, 0x00, 0x52, 0x04];
        frame.extend_from_slice(payload);
        frame.push(checksum(&frame[5..80]));
        frame.push(checksum(&frame[2..81]));
        frame
    }

    /// Serve `frame` for exactly one connection on a loopback port.
    async fn one_shot_station(frame: Vec<u8>) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut req = [0u8; 8];
            sock.read_exact(&mut req).await.unwrap();
            assert_eq!(req, GET_ACTUALS);
            sock.write_all(&frame).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn poll_caches_readings_on_valid_frame() {
        let addr = one_shot_station(build_frame(&sample_payload())).await;
        let mut gateway = StationGateway::new(
            "garden",
            &addr.ip().to_string(),
            addr.port(),
            Duration::from_secs(1),
        );

        gateway.poll().await.unwrap();

        assert!(gateway.is_valid());
        assert!(gateway.last_update().is_some());
        assert_eq!(gateway.get("rain_day"), Some(12.5));
        assert_eq!(gateway.get("out_temp"), Some(20.0));
        assert_eq!(gateway.get("in_humidity"), Some(45.0));
        // Unknown names never error
        assert_eq!(gateway.get("no_such_field"), None);
    }

    #[tokio::test]
    async fn checksum_mismatch_invalidates_gateway() {
        let mut frame = build_frame(&sample_payload());
        frame[80] = frame[80].wrapping_add(1);
        let addr = one_shot_station(frame).await;
        let mut gateway = StationGateway::new(
            "garden",
            &addr.ip().to_string(),
            addr.port(),
            Duration::from_secs(1),
        );

        let err = gateway.poll().await.unwrap_err();
        assert!(matches!(err, PollError::Frame(_)));
        assert!(!gateway.is_valid());
        assert_eq!(gateway.get("rain_day"), None);
        assert_eq!(gateway.get("out_temp"), None);
    }

    #[tokio::test]
    async fn failed_poll_discards_previously_cached_readings() {
        let addr = one_shot_station(build_frame(&sample_payload())).await;
        let mut gateway = StationGateway::new(
            "garden",
            &addr.ip().to_string(),
            addr.port(),
            Duration::from_secs(1),
        );
        gateway.poll().await.unwrap();
        assert_eq!(gateway.get("out_temp"), Some(20.0));

        // Next poll hits a dead port; the stale cache must not be served
        let _ = gateway.poll().await.unwrap_err();
        assert!(!gateway.is_valid());
        assert_eq!(gateway.get("out_temp"), None);
    }

    #[tokio::test]
    async fn sentinel_reading_reports_none_while_valid() {
        let mut payload = sample_payload();
        // out_temp is the second observation: tag at 3, value at 4..6
        payload[4] = 0xFF;
        payload[5] = 0xFF;
        let addr = one_shot_station(build_frame(&payload)).await;
        let mut gateway = StationGateway::new(
            "garden",
            &addr.ip().to_string(),
            addr.port(),
            Duration::from_secs(1),
        );

        gateway.poll().await.unwrap();
        assert!(gateway.is_valid());
        assert_eq!(gateway.get("out_temp"), None);
        assert_eq!(gateway.get("in_temp"), Some(21.5));
    }

    #[tokio::test]
    async fn configure_survives_bad_frame_but_not_transport_failure() {
        // Undecodable frame: reachable station, gateway comes up INVALID
        let mut frame = build_frame(&sample_payload());
        frame[81] = frame[81].wrapping_add(1);
        let addr = one_shot_station(frame).await;
        let gateway = StationGateway::configure(
            "garden",
            &addr.ip().to_string(),
            addr.port(),
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        assert!(!gateway.is_valid());

        // Dead port: configuration itself fails
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead = listener.local_addr().unwrap();
        drop(listener);
        let err = StationGateway::configure(
            "garden",
            &dead.ip().to_string(),
            dead.port(),
            Duration::from_secs(1),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TransportError::Connection { .. }));
    }

    #[tokio::test]
    async fn registry_keys_gateways_by_name() {
        let mut registry = StationRegistry::new();
        assert!(registry.is_empty());
        registry.insert(StationGateway::new(
            "roof",
            "127.0.0.1",
            45000,
            Duration::from_secs(1),
        ));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("roof").unwrap().host(), "127.0.0.1");
        assert!(registry.get("garden").is_none());
    }
}
