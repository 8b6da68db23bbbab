mod config;
mod error;
mod protocol;
mod sensor;
mod station;
mod utils;

use log::{debug, error, info, warn};
use tokio::time::sleep;

use config::PollerConfig;
use sensor::SENSORS;
use station::{StationGateway, StationRegistry};
use utils::format_datetime;

/// Build the registry by configuring every station from the config.
///
/// A station whose initial exchange fails outright is logged and skipped;
/// a station that answers but sends a bad frame is kept in the INVALID state
/// and picked up by the next poll cycle.
async fn setup_registry(config: &PollerConfig) -> StationRegistry {
    let mut registry = StationRegistry::new();

    for station in &config.stations {
        match StationGateway::configure(&station.name, &station.host, station.port, config.timeout)
            .await
        {
            Ok(gateway) => {
                info!(
                    "Configured station '{}' at {}:{} (valid: {})",
                    station.name,
                    station.host,
                    station.port,
                    gateway.is_valid()
                );
                registry.insert(gateway);
            }
            Err(e) => {
                error!("Failed to configure station '{}': {}", station.name, e);
            }
        }
    }

    registry
}

/// Log the decoded readings of one station at debug level.
fn log_summary(gateway: &StationGateway) {
    debug!("Summary for {}:", gateway.name());
    if let Some(last) = gateway.last_update() {
        debug!("  last update: {}", format_datetime(&last));
    }
    for spec in &SENSORS {
        match spec.read(gateway) {
            Some(value) => debug!("  {}: {} {}", spec.field, value, spec.unit),
            None => debug!("  {}: no data", spec.field),
        }
    }
}

async fn poll_loop(config: PollerConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting WS980WiFi polling service");

    let mut registry = setup_registry(&config).await;
    if registry.is_empty() {
        return Err("no station could be configured".into());
    }
    info!("Polling {} station(s)", registry.len());

    loop {
        sleep(config.poll_interval).await;

        debug!("Updating...");
        for (name, gateway) in registry.iter_mut() {
            match gateway.poll().await {
                Ok(()) => log_summary(gateway),
                Err(e) => warn!("Poll failed for station '{}': {}", name, e),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match PollerConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        let _ = tx.send(());
    });

    // Run the poll loop or wait for shutdown signal
    tokio::select! {
        result = poll_loop(config) => {
            match result {
                Ok(_) => info!("Program completed successfully"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        _ = &mut rx => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
