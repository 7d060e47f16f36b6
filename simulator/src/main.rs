use clap::Parser;
use log::info;
use rest::serve_rest_endpoint;
use sensor::{Sample, SimulatedSensor};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::io::BufReader;

mod rest;
mod sensor;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct Configuration {
    listen: String,
    static_dir: PathBuf,
    measurement_interval_ms: u64,
    #[serde(default)]
    response_delay_ms: u64,
    #[serde(default)]
    error_every: Option<u64>,
    samples: Vec<Sample>,
}

#[derive(Debug, Error)]
pub(crate) enum SimulatorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("configuration lists no samples")]
    NoSamples,
    #[error("measurement interval must be positive")]
    ZeroInterval,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,
}

impl Args {
    async fn get_config_file(&self) -> Result<Configuration, SimulatorError> {
        let config = File::open(&self.config).await?;
        let mut config_file = String::new();
        BufReader::new(config)
            .read_to_string(&mut config_file)
            .await?;
        Ok(serde_yaml::from_str::<Configuration>(&config_file)?)
    }
}

#[tokio::main(worker_threads = 2)]
async fn main() -> Result<(), SimulatorError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.get_config_file().await?;
    let sensor = SimulatedSensor::new(
        config.samples.clone(),
        Duration::from_millis(config.measurement_interval_ms),
    )?;
    info!(
        "Simulating {} samples, serving {}",
        config.samples.len(),
        config.static_dir.display()
    );

    serve_rest_endpoint(sensor, &config).await
}

#[cfg(test)]
mod test {
    use super::*;
    #[tokio::test]
    pub async fn deserializes_sample_config() {
        let config = File::open("config-sample.yaml").await.unwrap();
        let mut config_file = String::new();
        BufReader::new(config)
            .read_to_string(&mut config_file)
            .await
            .unwrap();
        let config = serde_yaml::from_str::<Configuration>(&config_file).unwrap();
        assert_eq!(config.samples.len(), 3);
        assert_eq!(config.error_every, Some(10));
        SimulatedSensor::new(
            config.samples,
            Duration::from_millis(config.measurement_interval_ms),
        )
        .unwrap();
    }
}
