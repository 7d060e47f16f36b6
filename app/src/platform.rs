use chrono::{DateTime, Utc};
use futures::future::LocalBoxFuture;

pub(crate) trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The single-threaded event loop everything runs on.
///
/// Timers stay scheduled for as long as the returned handle is alive, dropping it cancels them.
pub(crate) trait EventLoop {
    type Timer: 'static;

    fn every(&self, millis: u32, tick: Box<dyn FnMut()>) -> Self::Timer;

    fn after(&self, millis: u32, callback: Box<dyn FnOnce()>) -> Self::Timer;

    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}
