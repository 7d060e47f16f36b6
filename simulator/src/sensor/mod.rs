use std::time::{Duration, Instant};

use dht22_dashboard_shared::SensorReading;
use serde::{Deserialize, Serialize};

use crate::SimulatorError;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub(crate) struct Sample {
    temp_c: f64,
    humid_p: f64,
    heatidx_c: f64,
}

/// Replays the configured samples, taking the next one every measurement interval.
pub(crate) struct SimulatedSensor {
    samples: Vec<Sample>,
    interval: Duration,
    started: Instant,
}

impl SimulatedSensor {
    pub(crate) fn new(samples: Vec<Sample>, interval: Duration) -> Result<Self, SimulatorError> {
        if samples.is_empty() {
            return Err(SimulatorError::NoSamples);
        }
        if interval.is_zero() {
            return Err(SimulatorError::ZeroInterval);
        }
        Ok(Self {
            samples,
            interval,
            started: Instant::now(),
        })
    }

    pub(crate) fn current(&self) -> SensorReading {
        self.reading_after(self.started.elapsed())
    }

    fn reading_after(&self, elapsed: Duration) -> SensorReading {
        let interval_ms = self.interval.as_millis();
        let elapsed_ms = elapsed.as_millis();
        let measurement = elapsed_ms / interval_ms;
        let sample = self.samples[(measurement % self.samples.len() as u128) as usize];
        SensorReading {
            temp_c: sample.temp_c,
            humid_p: sample.humid_p,
            heatidx_c: sample.heatidx_c,
            age_ms: (elapsed_ms % interval_ms) as u64,
        }
    }
}
