/// Presentation layer: unit labels and post-decode scale factors
///
/// The protocol core reports values in the station's native units. Consumers
/// usually want a display unit and, for the wind speeds, a conversion from
/// m/s to km/h. That conversion is a presentation concern, so it lives here
/// rather than in the decoder.
use crate::station::StationGateway;

#[derive(Debug, Clone, Copy)]
pub struct SensorSpec {
    pub field: &'static str,
    pub unit: &'static str,
    /// Linear factor applied after decoding; values with a factor are
    /// rounded to two decimals.
    pub factor: Option<f64>,
}

const fn sensor(field: &'static str, unit: &'static str, factor: Option<f64>) -> SensorSpec {
    SensorSpec {
        field,
        unit,
        factor,
    }
}

/// m/s to km/h, applied to both wind speeds.
const WIND_KMH_FACTOR: f64 = 3.6;

/// Default presentation for every observation the station reports.
pub const SENSORS: [SensorSpec; 23] = [
    sensor("in_temp", "°C", None),
    sensor("out_temp", "°C", None),
    sensor("dewpoint", "°C", None),
    sensor("windchill", "°C", None),
    sensor("heatindex", "°C", None),
    sensor("in_humidity", "%", None),
    sensor("out_humidity", "%", None),
    sensor("abs_baro", "mbar", None),
    sensor("rel_baro", "mbar", None),
    sensor("wind_dir", "°", None),
    sensor("wind_speed", "km/h", Some(WIND_KMH_FACTOR)),
    sensor("gust_speed", "km/h", Some(WIND_KMH_FACTOR)),
    sensor("rain_event", "mm", None),
    sensor("rain_rate", "mm/h", None),
    sensor("rain_hour", "mm", None),
    sensor("rain_day", "mm", None),
    sensor("rain_week", "mm", None),
    sensor("rain_month", "mm", None),
    sensor("rain_year", "mm", None),
    sensor("rain_totals", "mm", None),
    sensor("light", "lux", None),
    sensor("uv", "uW/m²", None),
    sensor("uvi", "", None),
];

impl SensorSpec {
    /// Apply the presentation factor to a decoded value.
    pub fn apply(&self, value: f64) -> f64 {
        match self.factor {
            Some(factor) => (value * factor * 100.0).round() / 100.0,
            None => value,
        }
    }

    /// Read this sensor's value from a gateway, applying the factor.
    ///
    /// `None` when the gateway is invalid or the observation has no data.
    pub fn read(&self, gateway: &StationGateway) -> Option<f64> {
        gateway.get(self.field).map(|v| self.apply(v))
    }
}
