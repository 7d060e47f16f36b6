//! Live "time since" labels.
//!
//! Every element flagged as live carries a timestamp attribute. [`LastUpdated::initialize`] gives
//! each such element one timer that rewrites its text as a relative time ("3 minutes ago"). It may
//! be called again whenever elements are added or removed, previous timers are cancelled first.

use std::rc::Rc;

use chrono::{DateTime, Utc};
use log::error;
use thiserror::Error;

use crate::platform::{Clock, EventLoop};

pub(crate) use self::format::{FormatStyle, FormatterFactory, PlainFormatter, RelativeTimeFormat};
use self::timestamp::parse_timestamp;
pub(crate) use self::units::TimeUnit;

mod format;
mod timestamp;
mod units;

pub(crate) const DEFAULT_INTERVAL_MS: u32 = 10_000;

/// An element whose text shows a relative time.
pub(crate) trait TimedElement {
    fn timestamp(&self) -> Option<String>;
    fn set_text(&self, text: &str);
    /// Identifies the element in log messages.
    fn describe(&self) -> String;
}

/// Finds the elements currently flagged as live.
pub(crate) trait LiveElements {
    type Element: TimedElement + 'static;

    fn live_elements(&self) -> Vec<Self::Element>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum LastUpdatedError {
    #[error("last-updated: no timestamp attribute on {0}")]
    MissingTimestamp(String),
    #[error("last-updated: failed to parse timestamp {0:?}")]
    InvalidTimestamp(String),
}

pub(crate) struct LastUpdated<D: LiveElements, E: EventLoop> {
    document: D,
    event_loop: E,
    clock: Rc<dyn Clock>,
    jobs: Vec<E::Timer>,
}

impl<D: LiveElements, E: EventLoop> LastUpdated<D, E> {
    pub(crate) fn new(document: D, event_loop: E, clock: Rc<dyn Clock>) -> Self {
        Self {
            document,
            event_loop,
            clock,
            jobs: Vec::new(),
        }
    }

    pub(crate) fn stop(&mut self) {
        self.jobs.clear();
    }

    /// Schedules every live element, `None` refreshes at [`DEFAULT_INTERVAL_MS`].
    pub(crate) fn initialize(
        &mut self,
        interval_ms: Option<u32>,
        formatter: Rc<dyn RelativeTimeFormat>,
    ) {
        self.stop();
        let interval_ms = interval_ms.unwrap_or(DEFAULT_INTERVAL_MS);
        for element in self.document.live_elements() {
            let target = match target_of(&element) {
                Ok(target) => target,
                Err(e) => {
                    error!("{e}");
                    continue;
                }
            };
            let clock = self.clock.clone();
            let formatter = formatter.clone();
            let update = move || {
                element.set_text(&relative_text(target, clock.now(), formatter.as_ref()));
            };
            update();
            self.jobs
                .push(self.event_loop.every(interval_ms, Box::new(update)));
        }
    }

    pub(crate) fn active_jobs(&self) -> usize {
        self.jobs.len()
    }
}

fn target_of(element: &impl TimedElement) -> Result<DateTime<Utc>, LastUpdatedError> {
    let raw = element
        .timestamp()
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| LastUpdatedError::MissingTimestamp(element.describe()))?;
    parse_timestamp(&raw).ok_or(LastUpdatedError::InvalidTimestamp(raw))
}

pub(crate) fn relative_text(
    target: DateTime<Utc>,
    now: DateTime<Utc>,
    formatter: &dyn RelativeTimeFormat,
) -> String {
    let (value, unit) = TimeUnit::relative((target - now).num_milliseconds());
    formatter.format(value, unit)
}
