use chrono::{DateTime, SecondsFormat, Utc};
use dht22_dashboard_shared::SensorReading;

/// A reading formatted for the page.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ReadingDisplay {
    pub(crate) temperature: String,
    pub(crate) humidity: String,
    pub(crate) heat_index: String,
    /// ISO 8601, doubles as the timestamp of the live "data age" element.
    pub(crate) measured_at: String,
}

impl ReadingDisplay {
    pub(crate) fn new(reading: &SensorReading, measured_at: DateTime<Utc>) -> Self {
        Self {
            temperature: one_decimal(reading.temp_c),
            humidity: one_decimal(reading.humid_p),
            heat_index: one_decimal(reading.heatidx_c),
            measured_at: measured_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Like `Number.prototype.toFixed(1)`: exact ties round away from zero, not to even.
fn one_decimal(value: f64) -> String {
    let scaled = value * 10.0;
    let exact = value.mul_add(10.0, -scaled) == 0.0;
    if exact && scaled.fract().abs() == 0.5 {
        format!("{:.1}", scaled.round() / 10.0)
    } else {
        format!("{value:.1}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TestPostOutcome {
    Pending,
    Succeeded(String),
    Failed(String),
}

impl TestPostOutcome {
    pub(crate) fn message(&self) -> String {
        match self {
            TestPostOutcome::Pending => "…".into(),
            TestPostOutcome::Succeeded(body) => format!("✔️ {body}"),
            TestPostOutcome::Failed(error) => format!("❌ {error}"),
        }
    }
}

/// The controls and fields the dashboard drives.
pub(crate) trait DashboardView {
    fn has_focus(&self) -> bool;

    fn polling_enabled(&self) -> bool;

    fn poll_interval_secs(&self) -> f64;

    fn set_refresh_disabled(&self, disabled: bool);

    /// Fills the value fields and turns the data age field into a live element.
    fn show_reading(&self, reading: &ReadingDisplay);

    fn show_error(&self, message: &str);

    fn hide_error(&self);

    fn set_testpost_disabled(&self, disabled: bool);

    fn show_testpost(&self, outcome: &TestPostOutcome);
}

#[cfg(test)]
mod test {
    use chrono::TimeZone;

    use super::*;

    #[test]
    pub fn formats_values_to_one_decimal() {
        let reading = SensorReading {
            temp_c: 21.34,
            humid_p: 55.6,
            heatidx_c: 21.9,
            age_ms: 1500,
        };
        let at = Utc.with_ymd_and_hms(2023, 9, 1, 12, 0, 0).unwrap();
        assert_eq!(
            ReadingDisplay::new(&reading, at),
            ReadingDisplay {
                temperature: "21.3".into(),
                humidity: "55.6".into(),
                heat_index: "21.9".into(),
                measured_at: "2023-09-01T12:00:00.000Z".into(),
            }
        );

        let tied = SensorReading {
            temp_c: 21.25,
            humid_p: 0.25,
            heatidx_c: -0.25,
            age_ms: 0,
        };
        let shown = ReadingDisplay::new(&tied, at);
        assert_eq!(shown.temperature, "21.3");
        assert_eq!(shown.humidity, "0.3");
        assert_eq!(shown.heat_index, "-0.3");
    }

    #[test]
    pub fn ties_round_away_from_zero() {
        assert_eq!(one_decimal(21.25), "21.3");
        assert_eq!(one_decimal(0.25), "0.3");
        assert_eq!(one_decimal(-0.25), "-0.3");
        // 1.15 is stored slightly below the tie
        assert_eq!(one_decimal(1.15), "1.1");
        assert_eq!(one_decimal(20.0), "20.0");
    }

    #[test]
    pub fn testpost_messages() {
        assert_eq!(TestPostOutcome::Pending.message(), "…");
        assert_eq!(
            TestPostOutcome::Succeeded("hello".into()).message(),
            "✔️ hello"
        );
        assert_eq!(
            TestPostOutcome::Failed("HTTP error! Status: 404".into()).message(),
            "❌ HTTP error! Status: 404"
        );
    }
}
