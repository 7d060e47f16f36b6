use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses the timestamp formats accepted by `Date.parse` in practice.
///
/// Date-only values (`YYYY`, `YYYY-MM`, `YYYY-MM-DD`) are midnight UTC, date-times without an
/// offset are local time. The epoch itself counts as unparseable.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    let parsed = parse_with_offset(raw)
        .or_else(|| parse_date_only(raw))
        .or_else(|| parse_naive(raw))?;
    if parsed.timestamp_millis() == 0 {
        return None;
    }
    Some(parsed)
}

fn parse_with_offset(raw: &str) -> Option<DateTime<Utc>> {
    let with_seconds = seconds_added(raw);
    DateTime::parse_from_rfc3339(with_seconds.as_deref().unwrap_or(raw))
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// `2023-09-01T12:00Z` becomes `2023-09-01T12:00:00Z`, anything else is left alone.
fn seconds_added(raw: &str) -> Option<String> {
    let (minutes, zone) = (raw.get(..16)?, raw.get(16..)?);
    zone.starts_with(['Z', 'z', '+', '-'])
        .then(|| format!("{minutes}:00{zone}"))
}

fn parse_date_only(raw: &str) -> Option<DateTime<Utc>> {
    let date = match raw.split('-').collect::<Vec<_>>()[..] {
        [year] if digits(year, 4) => NaiveDate::from_ymd_opt(year.parse().ok()?, 1, 1)?,
        [year, month] if digits(year, 4) && digits(month, 2) => {
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?
        }
        [year, month, day] if digits(year, 4) && digits(month, 2) && digits(day, 2) => {
            NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?
        }
        _ => return None,
    };
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

fn digits(part: &str, len: usize) -> bool {
    part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
}

fn parse_naive(raw: &str) -> Option<DateTime<Utc>> {
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
}
