pub mod catalog;
pub mod decode;
pub mod frame;

pub use decode::{decode_observations, WeatherData};
pub use frame::validate_frame;
