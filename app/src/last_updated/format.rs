use std::rc::Rc;

use strum::AsRefStr;

use super::units::TimeUnit;

/// Verbosity of the rendered phrase, named like the `style` option of `Intl.RelativeTimeFormat`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum FormatStyle {
    Long,
    Short,
}

pub(crate) trait RelativeTimeFormat {
    /// Renders `value` units, negative values lie in the past.
    fn format(&self, value: i64, unit: TimeUnit) -> String;
}

pub(crate) trait FormatterFactory {
    fn relative_time(&self, style: FormatStyle) -> Rc<dyn RelativeTimeFormat>;
}

/// English phrasing without locale data: "45 seconds ago", "in 1 year", "now".
pub(crate) struct PlainFormatter;

impl RelativeTimeFormat for PlainFormatter {
    fn format(&self, value: i64, unit: TimeUnit) -> String {
        if value == 0 && unit == TimeUnit::Second {
            return "now".into();
        }
        let count = value.unsigned_abs();
        let plural = if count == 1 { "" } else { "s" };
        if value < 0 {
            format!("{count} {}{plural} ago", unit.as_ref())
        } else {
            format!("in {count} {}{plural}", unit.as_ref())
        }
    }
}
