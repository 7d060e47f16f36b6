use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const SENSOR_PATH: &str = "/sensor.json";
pub const TESTPOST_PATH: &str = "/testpost";

/// Body of the demo write request.
pub const TESTPOST_BODY: &str = "Hi there";

/// One reading as reported by the device on `GET /sensor.json`.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct SensorReading {
    pub temp_c: f64,
    pub humid_p: f64,
    pub heatidx_c: f64,
    /// Milliseconds since the device took the measurement.
    pub age_ms: u64,
}

impl SensorReading {
    /// Approximates when the measurement was taken, counting the age back from `fetch_started`.
    ///
    /// Returns `None` if the age moves the instant out of the representable range.
    pub fn measured_at(&self, fetch_started: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let age = i64::try_from(self.age_ms).ok()?;
        fetch_started.checked_sub_signed(Duration::try_milliseconds(age)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    pub fn deserializes_device_payload() {
        let reading = serde_json::from_str::<SensorReading>(
            r#"{"temp_c":21.34,"humid_p":55.6,"heatidx_c":21.9,"age_ms":1500}"#,
        )
        .unwrap();
        assert_eq!(
            reading,
            SensorReading {
                temp_c: 21.34,
                humid_p: 55.6,
                heatidx_c: 21.9,
                age_ms: 1500
            }
        );
    }

    #[test]
    pub fn rejects_negative_age() {
        let reading = serde_json::from_str::<SensorReading>(
            r#"{"temp_c":21.34,"humid_p":55.6,"heatidx_c":21.9,"age_ms":-5}"#,
        );
        assert!(reading.is_err());
    }

    #[test]
    pub fn rejects_missing_fields() {
        let reading = serde_json::from_str::<SensorReading>(r#"{"temp_c":21.34}"#);
        assert!(reading.is_err());
    }

    #[test]
    pub fn measured_at_counts_back_from_fetch_start() {
        let start = Utc.with_ymd_and_hms(2023, 9, 1, 12, 0, 0).unwrap();
        let reading = SensorReading {
            temp_c: 0.0,
            humid_p: 0.0,
            heatidx_c: 0.0,
            age_ms: 1500,
        };
        assert_eq!(
            reading.measured_at(start),
            Some(start - Duration::milliseconds(1500))
        );
    }

    #[test]
    pub fn absurd_age_is_out_of_range() {
        let start = Utc.with_ymd_and_hms(2023, 9, 1, 12, 0, 0).unwrap();
        let reading = SensorReading {
            temp_c: 0.0,
            humid_p: 0.0,
            heatidx_c: 0.0,
            age_ms: u64::MAX,
        };
        assert_eq!(reading.measured_at(start), None);
    }
}
