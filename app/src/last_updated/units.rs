use strum::{AsRefStr, EnumIter, IntoEnumIterator};

const SECOND_MS: i64 = 1000;
const MINUTE_MS: i64 = SECOND_MS * 60;
const HOUR_MS: i64 = MINUTE_MS * 60;
const DAY_MS: i64 = HOUR_MS * 24;
const WEEK_MS: i64 = DAY_MS * 7;
const MONTH_MS: i64 = DAY_MS * 30;
const YEAR_MS: i64 = DAY_MS * 356;

/// Units a relative time is rendered in, largest first.
///
/// The lowercase names are the unit identifiers understood by `Intl.RelativeTimeFormat`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum TimeUnit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl TimeUnit {
    pub(crate) const fn millis(self) -> i64 {
        match self {
            TimeUnit::Year => YEAR_MS,
            TimeUnit::Month => MONTH_MS,
            TimeUnit::Week => WEEK_MS,
            TimeUnit::Day => DAY_MS,
            TimeUnit::Hour => HOUR_MS,
            TimeUnit::Minute => MINUTE_MS,
            TimeUnit::Second => SECOND_MS,
        }
    }

    /// The largest unit not longer than `magnitude_ms`, falling back to seconds.
    pub(crate) fn for_magnitude(magnitude_ms: i64) -> TimeUnit {
        TimeUnit::iter()
            .find(|unit| magnitude_ms >= unit.millis())
            .unwrap_or(TimeUnit::Second)
    }

    /// Splits a signed difference (positive is in the future) into a rounded value and its unit.
    pub(crate) fn relative(diff_ms: i64) -> (i64, TimeUnit) {
        let unit = TimeUnit::for_magnitude(diff_ms.saturating_abs());
        // half rounds towards +inf, like Math.round
        let value = (diff_ms as f64 / unit.millis() as f64 + 0.5).floor() as i64;
        (value, unit)
    }
}
