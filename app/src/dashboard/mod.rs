//! Polls the sensor device and drives the page controls.

use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use chrono::{DateTime, Utc};
use dht22_dashboard_shared::{SensorReading, TESTPOST_BODY};
use log::{debug, error, info, warn};

use crate::{
    config::DashboardConfig,
    last_updated::{FormatStyle, FormatterFactory, LastUpdated, LiveElements, RelativeTimeFormat},
    platform::{Clock, EventLoop},
};

pub(crate) use self::api::{decode_reading, DeviceApi, FetchError};
pub(crate) use self::view::{DashboardView, ReadingDisplay, TestPostOutcome};

mod api;
mod view;

struct PollingSession<T> {
    enabled: bool,
    in_flight: bool,
    invalid_interval: bool,
    poll_timer: Option<T>,
    startup_timer: Option<T>,
}

impl<T> Default for PollingSession<T> {
    fn default() -> Self {
        Self {
            enabled: false,
            in_flight: false,
            invalid_interval: false,
            poll_timer: None,
            startup_timer: None,
        }
    }
}

pub(crate) struct Dashboard<D: LiveElements, E: EventLoop> {
    config: DashboardConfig,
    view: Rc<dyn DashboardView>,
    device: Rc<dyn DeviceApi>,
    clock: Rc<dyn Clock>,
    event_loop: E,
    formatters: Rc<dyn FormatterFactory>,
    formatter: RefCell<Rc<dyn RelativeTimeFormat>>,
    last_updated: RefCell<LastUpdated<D, E>>,
    session: RefCell<PollingSession<E::Timer>>,
}

impl<D, E> Dashboard<D, E>
where
    D: LiveElements + 'static,
    E: EventLoop + Clone + 'static,
{
    pub(crate) fn new(
        config: DashboardConfig,
        view: Rc<dyn DashboardView>,
        device: Rc<dyn DeviceApi>,
        document: D,
        event_loop: E,
        clock: Rc<dyn Clock>,
        formatters: Rc<dyn FormatterFactory>,
    ) -> Rc<Self> {
        let last_updated = LastUpdated::new(document, event_loop.clone(), clock.clone());
        Rc::new(Self {
            config,
            view,
            device,
            clock,
            event_loop,
            formatter: RefCell::new(formatters.relative_time(FormatStyle::Long)),
            formatters,
            last_updated: RefCell::new(last_updated),
            session: Default::default(),
        })
    }

    /// Brings the page into its initial state, `narrow` tells whether the viewport is narrow.
    pub(crate) fn start(self: &Rc<Self>, narrow: bool) {
        self.update_formatter(narrow);
        self.update_settings();
        self.polling_toggled();
    }

    /// Re-renders all live timestamps, short phrasing on narrow viewports.
    pub(crate) fn update_formatter(&self, narrow: bool) {
        let style = if narrow {
            FormatStyle::Short
        } else {
            FormatStyle::Long
        };
        *self.formatter.borrow_mut() = self.formatters.relative_time(style);
        self.refresh_live_timestamps();
    }

    fn refresh_live_timestamps(&self) {
        let formatter = self.formatter.borrow().clone();
        let mut last_updated = self.last_updated.borrow_mut();
        last_updated.initialize(Some(self.config.live_refresh_ms), formatter);
        debug!("{} live timestamps", last_updated.active_jobs());
    }

    pub(crate) fn spawn_fetch(self: &Rc<Self>) {
        let this = self.clone();
        self.event_loop
            .spawn(Box::pin(async move { this.fetch_sensordata().await }));
    }

    pub(crate) async fn fetch_sensordata(&self) {
        {
            let mut session = self.session.borrow_mut();
            if session.in_flight {
                return;
            }
            if !self.view.has_focus() {
                debug!("Skipping fetch because the document does not have focus");
                return;
            }
            session.in_flight = true;
        }
        self.view.set_refresh_disabled(true);
        let started = self.clock.now();

        let shown = match self.device.sensor_reading().await {
            Ok(reading) => self.show_reading(&reading, started),
            Err(e) => Err(e),
        };
        if let Err(e) = shown {
            error!("Fetching sensor data failed: {e}");
            self.view.show_error(&format!("❌ {e}"));
        }

        let enabled = {
            let mut session = self.session.borrow_mut();
            session.in_flight = false;
            session.enabled
        };
        if !enabled {
            self.view.set_refresh_disabled(false);
        }
    }

    fn show_reading(
        &self,
        reading: &SensorReading,
        started: DateTime<Utc>,
    ) -> Result<(), FetchError> {
        let measured_at = reading
            .measured_at(started)
            .ok_or(FetchError::AgeOutOfRange(reading.age_ms))?;
        self.view.show_reading(&ReadingDisplay::new(reading, measured_at));
        self.refresh_live_timestamps();
        self.view.hide_error();
        Ok(())
    }

    /// Restarts the poll timer from the current state of the controls.
    pub(crate) fn update_settings(self: &Rc<Self>) {
        let enabled = self.view.polling_enabled();
        let interval_secs = self.view.poll_interval_secs();
        let mut session = self.session.borrow_mut();
        if session.poll_timer.take().is_some() {
            debug!("Stopping fetch timer");
        }
        session.enabled = enabled;
        let millis = if enabled {
            interval_millis(interval_secs)
        } else {
            None
        };
        if enabled && millis.is_none() {
            warn!("Not polling, invalid interval {interval_secs}");
            self.view
                .show_error(&format!("❌ Not polling, invalid interval {interval_secs}"));
            session.invalid_interval = true;
            return;
        }
        if std::mem::take(&mut session.invalid_interval) {
            self.view.hide_error();
        }
        if let Some(millis) = millis {
            debug!("Starting fetch timer, interval {millis}");
            let this = Rc::downgrade(self);
            session.poll_timer = Some(
                self.event_loop
                    .every(millis, Box::new(move || fetch_if_alive(&this))),
            );
        }
    }

    /// While polling the refresh button belongs to the timer.
    pub(crate) fn polling_toggled(&self) {
        if self.view.polling_enabled() {
            self.view.set_refresh_disabled(true);
        } else if !self.session.borrow().in_flight {
            self.view.set_refresh_disabled(false);
        }
    }

    /// Fetches once after the startup delay, leaving the device alone while the page loads.
    pub(crate) fn schedule_startup_fetch(self: &Rc<Self>) {
        let this = Rc::downgrade(self);
        let timer = self.event_loop.after(
            self.config.startup_delay_ms,
            Box::new(move || {
                if let Some(this) = this.upgrade() {
                    if this.view.polling_enabled() {
                        this.spawn_fetch();
                    }
                }
            }),
        );
        if self.session.borrow_mut().startup_timer.replace(timer).is_some() {
            debug!("Rescheduling startup fetch");
        }
    }

    pub(crate) fn spawn_testpost(self: &Rc<Self>) {
        let this = self.clone();
        self.event_loop
            .spawn(Box::pin(async move { this.send_testpost().await }));
    }

    pub(crate) async fn send_testpost(&self) {
        self.view.set_testpost_disabled(true);
        self.view.show_testpost(&TestPostOutcome::Pending);
        let outcome = match self.device.test_post(TESTPOST_BODY).await {
            Ok(body) => {
                info!("{body}");
                TestPostOutcome::Succeeded(body)
            }
            Err(e) => {
                error!("Test POST failed: {e}");
                TestPostOutcome::Failed(e.to_string())
            }
        };
        self.view.show_testpost(&outcome);
        self.view.set_testpost_disabled(false);
    }
}

fn fetch_if_alive<D, E>(dashboard: &Weak<Dashboard<D, E>>)
where
    D: LiveElements + 'static,
    E: EventLoop + Clone + 'static,
{
    if let Some(dashboard) = dashboard.upgrade() {
        dashboard.spawn_fetch();
    }
}

fn interval_millis(secs: f64) -> Option<u32> {
    let millis = (secs * 1000.0).round();
    (millis.is_finite() && millis >= 1.0 && millis <= u32::MAX as f64).then_some(millis as u32)
}
