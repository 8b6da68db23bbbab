pub mod gateway;
pub mod transport;

pub use gateway::{StationGateway, StationRegistry};
