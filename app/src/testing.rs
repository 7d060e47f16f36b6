//! Fakes of the browser seams for native tests.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use chrono::{DateTime, Duration, Utc};
use futures::{
    executor::{LocalPool, LocalSpawner},
    future::LocalBoxFuture,
    task::LocalSpawnExt,
};

use crate::{
    last_updated::{LiveElements, TimedElement},
    platform::{Clock, EventLoop},
};

#[derive(Clone)]
pub(crate) struct ManualClock(Rc<Cell<DateTime<Utc>>>);

impl ManualClock {
    pub(crate) fn at(now: DateTime<Utc>) -> Self {
        Self(Rc::new(Cell::new(now)))
    }

    pub(crate) fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}

struct Scheduled {
    millis: u32,
    repeating: bool,
    cancelled: Rc<Cell<bool>>,
    callback: Rc<RefCell<Box<dyn FnMut()>>>,
}

/// Cancels its timer when dropped, like the gloo timers.
pub(crate) struct ManualTimer(Rc<Cell<bool>>);

impl Drop for ManualTimer {
    fn drop(&mut self) {
        self.0.set(true);
    }
}

/// Runs timers and tasks only when told to.
#[derive(Clone)]
pub(crate) struct ManualEventLoop {
    timers: Rc<RefCell<Vec<Scheduled>>>,
    pool: Rc<RefCell<LocalPool>>,
    spawner: LocalSpawner,
}

impl Default for ManualEventLoop {
    fn default() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            timers: Default::default(),
            pool: Rc::new(RefCell::new(pool)),
            spawner,
        }
    }
}

impl ManualEventLoop {
    fn schedule(&self, millis: u32, repeating: bool, callback: Box<dyn FnMut()>) -> ManualTimer {
        let cancelled = Rc::new(Cell::new(false));
        self.timers.borrow_mut().push(Scheduled {
            millis,
            repeating,
            cancelled: cancelled.clone(),
            callback: Rc::new(RefCell::new(callback)),
        });
        ManualTimer(cancelled)
    }

    fn fire(&self, selector: impl Fn(&Scheduled) -> bool) {
        let due = self
            .timers
            .borrow()
            .iter()
            .filter(|t| !t.cancelled.get() && selector(t))
            .map(|t| (t.repeating, t.cancelled.clone(), t.callback.clone()))
            .collect::<Vec<_>>();
        for (repeating, cancelled, callback) in due {
            if cancelled.get() {
                continue;
            }
            if !repeating {
                cancelled.set(true);
            }
            (&mut *callback.borrow_mut())();
        }
        self.timers.borrow_mut().retain(|t| !t.cancelled.get());
    }

    /// Fires every live repeating timer with the given period once.
    pub(crate) fn fire_every(&self, millis: u32) {
        self.fire(|t| t.repeating && t.millis == millis);
    }

    /// Fires every pending one-shot timer.
    pub(crate) fn fire_once(&self) {
        self.fire(|t| !t.repeating);
    }

    pub(crate) fn active_timers(&self) -> usize {
        self.timers
            .borrow()
            .iter()
            .filter(|t| !t.cancelled.get())
            .count()
    }

    pub(crate) fn repeating_periods(&self) -> Vec<u32> {
        self.timers
            .borrow()
            .iter()
            .filter(|t| !t.cancelled.get() && t.repeating)
            .map(|t| t.millis)
            .collect()
    }

    /// Polls spawned tasks until none of them can make progress.
    pub(crate) fn run_until_stalled(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }
}

impl EventLoop for ManualEventLoop {
    type Timer = ManualTimer;

    fn every(&self, millis: u32, tick: Box<dyn FnMut()>) -> ManualTimer {
        self.schedule(millis, true, tick)
    }

    fn after(&self, millis: u32, callback: Box<dyn FnOnce()>) -> ManualTimer {
        let mut callback = Some(callback);
        self.schedule(
            millis,
            false,
            Box::new(move || {
                if let Some(callback) = callback.take() {
                    callback()
                }
            }),
        )
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        if let Err(e) = self.spawner.spawn_local(task) {
            panic!("failed to spawn task: {e:?}");
        }
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeElement {
    timestamp: Rc<RefCell<Option<String>>>,
    text: Rc<RefCell<String>>,
    markup: String,
}

impl FakeElement {
    pub(crate) fn with_timestamp(timestamp: &str) -> Self {
        Self {
            timestamp: Rc::new(RefCell::new(Some(timestamp.into()))),
            markup: format!("<span title=\"{timestamp}\">"),
            ..Default::default()
        }
    }

    pub(crate) fn without_timestamp(markup: &str) -> Self {
        Self {
            markup: markup.into(),
            ..Default::default()
        }
    }

    pub(crate) fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub(crate) fn set_timestamp(&self, timestamp: &str) {
        *self.timestamp.borrow_mut() = Some(timestamp.into());
    }
}

impl TimedElement for FakeElement {
    fn timestamp(&self) -> Option<String> {
        self.timestamp.borrow().clone()
    }

    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.into();
    }

    fn describe(&self) -> String {
        self.markup.clone()
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeDocument(Rc<RefCell<Vec<FakeElement>>>);

impl FakeDocument {
    pub(crate) fn with(elements: Vec<FakeElement>) -> Self {
        Self(Rc::new(RefCell::new(elements)))
    }

    pub(crate) fn push(&self, element: FakeElement) {
        self.0.borrow_mut().push(element);
    }
}

impl LiveElements for FakeDocument {
    type Element = FakeElement;

    fn live_elements(&self) -> Vec<FakeElement> {
        self.0.borrow().clone()
    }
}
