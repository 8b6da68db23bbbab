/// Observation-type catalog for the WS980WiFi "get actuals" payload
///
/// Each observation in the payload is introduced by a one-byte item id that
/// selects its canonical name, the number of value bytes that follow, and the
/// scaling applied to the raw big-endian integer. The station firmware uses a
/// fixed set of 23 item ids, 0x01 through 0x17.

// WS980WiFi item identifiers
pub const ITEM_INTEMP: u8 = 0x01; // C
pub const ITEM_OUTTEMP: u8 = 0x02; // C
pub const ITEM_DEWPOINT: u8 = 0x03; // C
pub const ITEM_WINDCHILL: u8 = 0x04; // C
pub const ITEM_HEATINDEX: u8 = 0x05; // C
pub const ITEM_INHUMI: u8 = 0x06; // %
pub const ITEM_OUTHUMI: u8 = 0x07; // %
pub const ITEM_ABSBARO: u8 = 0x08; // mbar
pub const ITEM_RELBARO: u8 = 0x09; // mbar
pub const ITEM_WINDDIRECTION: u8 = 0x0A; // degree
pub const ITEM_WINDSPEED: u8 = 0x0B; // m/s
pub const ITEM_GUSTSPEED: u8 = 0x0C; // m/s
pub const ITEM_RAINEVENT: u8 = 0x0D; // mm
pub const ITEM_RAINRATE: u8 = 0x0E; // mm/h
pub const ITEM_RAINHOUR: u8 = 0x0F; // mm
pub const ITEM_RAINDAY: u8 = 0x10; // mm
pub const ITEM_RAINWEEK: u8 = 0x11; // mm
pub const ITEM_RAINMONTH: u8 = 0x12; // mm
pub const ITEM_RAINYEAR: u8 = 0x13; // mm
pub const ITEM_RAINTOTALS: u8 = 0x14; // mm
pub const ITEM_LIGHT: u8 = 0x15; // lux
pub const ITEM_UV: u8 = 0x16; // uW/m^2
pub const ITEM_UVI: u8 = 0x17; // 0-15 index

/// Scaling from the raw wire integer to the physical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Value is reported as-is.
    Unit,
    /// Value is reported in tenths.
    Tenth,
}

impl Scale {
    pub fn apply(self, x: u32) -> f64 {
        match self {
            Scale::Unit => x as f64,
            Scale::Tenth => x as f64 / 10.0,
        }
    }
}

/// One entry of the observation catalog.
#[derive(Debug, Clone, Copy)]
pub struct ObservationType {
    pub tag: u8,
    pub name: &'static str,
    pub width: usize,
    pub scale: Scale,
}

const fn obs(tag: u8, name: &'static str, width: usize, scale: Scale) -> ObservationType {
    ObservationType {
        tag,
        name,
        width,
        scale,
    }
}

/// The full item catalog, indexed by linear search on the tag byte.
pub const CATALOG: [ObservationType; 23] = [
    obs(ITEM_INTEMP, "in_temp", 2, Scale::Tenth),
    obs(ITEM_OUTTEMP, "out_temp", 2, Scale::Tenth),
    obs(ITEM_DEWPOINT, "dewpoint", 2, Scale::Tenth),
    obs(ITEM_WINDCHILL, "windchill", 2, Scale::Tenth),
    obs(ITEM_HEATINDEX, "heatindex", 2, Scale::Tenth),
    obs(ITEM_INHUMI, "in_humidity", 1, Scale::Unit),
    obs(ITEM_OUTHUMI, "out_humidity", 1, Scale::Unit),
    obs(ITEM_ABSBARO, "abs_baro", 2, Scale::Tenth),
    obs(ITEM_RELBARO, "rel_baro", 2, Scale::Tenth),
    obs(ITEM_WINDDIRECTION, "wind_dir", 2, Scale::Unit),
    obs(ITEM_WINDSPEED, "wind_speed", 2, Scale::Tenth),
    obs(ITEM_GUSTSPEED, "gust_speed", 2, Scale::Tenth),
    obs(ITEM_RAINEVENT, "rain_event", 4, Scale::Tenth),
    obs(ITEM_RAINRATE, "rain_rate", 4, Scale::Tenth),
    obs(ITEM_RAINHOUR, "rain_hour", 4, Scale::Tenth),
    obs(ITEM_RAINDAY, "rain_day", 4, Scale::Tenth),
    obs(ITEM_RAINWEEK, "rain_week", 4, Scale::Tenth),
    obs(ITEM_RAINMONTH, "rain_month", 4, Scale::Tenth),
    obs(ITEM_RAINYEAR, "rain_year", 4, Scale::Tenth),
    obs(ITEM_RAINTOTALS, "rain_totals", 4, Scale::Tenth),
    obs(ITEM_LIGHT, "light", 4, Scale::Tenth),
    obs(ITEM_UV, "uv", 2, Scale::Unit),
    obs(ITEM_UVI, "uvi", 1, Scale::Unit),
];

/// Look up a catalog entry by its item id.
pub fn lookup(tag: u8) -> Option<&'static ObservationType> {
    CATALOG.iter().find(|o| o.tag == tag)
}
