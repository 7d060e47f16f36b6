use async_trait::async_trait;
use dht22_dashboard_shared::SensorReading;
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error("{0}")]
    Network(String),
    #[error("{0} (likely a timeout)")]
    Timeout(String),
    #[error("HTTP error! Status: {0}")]
    Status(u16),
    #[error("unreadable response body: {0}")]
    Body(String),
    #[error("invalid sensor data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("reading age of {0} ms is out of range")]
    AgeOutOfRange(u64),
}

/// The two endpoints of the sensor device.
#[async_trait(?Send)]
pub(crate) trait DeviceApi {
    async fn sensor_reading(&self) -> Result<SensorReading, FetchError>;

    async fn test_post(&self, body: &str) -> Result<String, FetchError>;
}

pub(crate) fn decode_reading(body: &str) -> Result<SensorReading, FetchError> {
    let reading = serde_json::from_str::<SensorReading>(body)?;
    debug!("{reading:?}");
    Ok(reading)
}
