use std::rc::Rc;

use futures::future::LocalBoxFuture;
use gloo::{
    events::EventListener,
    timers::callback::{Interval, Timeout},
};
use gloo_utils::{document, window};
use web_sys::MediaQueryList;

use crate::{dashboard::Dashboard, platform::EventLoop};

pub(crate) use self::dom::{DomDashboardView, DomDocument};
pub(crate) use self::http::HttpDevice;
pub(crate) use self::intl::IntlFormatters;

mod dom;
mod http;
mod intl;

pub(crate) type BrowserDashboard = Dashboard<DomDocument, BrowserEventLoop>;

#[derive(Clone, Copy, Default)]
pub(crate) struct BrowserEventLoop;

/// Held only so that dropping it clears the timer.
#[allow(dead_code)]
pub(crate) enum BrowserTimer {
    Interval(Interval),
    Timeout(Timeout),
}

impl EventLoop for BrowserEventLoop {
    type Timer = BrowserTimer;

    fn every(&self, millis: u32, tick: Box<dyn FnMut()>) -> BrowserTimer {
        BrowserTimer::Interval(Interval::new(millis, tick))
    }

    fn after(&self, millis: u32, callback: Box<dyn FnOnce()>) -> BrowserTimer {
        BrowserTimer::Timeout(Timeout::new(millis, callback))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

/// Hooks the page controls up to the dashboard for the lifetime of the page.
pub(crate) fn attach(
    dashboard: &Rc<BrowserDashboard>,
    view: &DomDashboardView,
    narrow: Option<MediaQueryList>,
) {
    if let Some(narrow) = narrow {
        let d = dashboard.clone();
        let query = narrow.clone();
        EventListener::new(&narrow, "change", move |_| d.update_formatter(query.matches()))
            .forget();
    }

    let d = dashboard.clone();
    EventListener::new(&view.refresh, "click", move |_| d.spawn_fetch()).forget();

    let d = dashboard.clone();
    EventListener::new(&view.poll_interval, "change", move |_| d.update_settings()).forget();

    let d = dashboard.clone();
    EventListener::new(&view.poll_enable, "change", move |_| {
        d.update_settings();
        d.polling_toggled();
    })
    .forget();

    let d = dashboard.clone();
    EventListener::new(&view.testpost, "click", move |_| d.spawn_testpost()).forget();

    if page_loaded() {
        dashboard.schedule_startup_fetch();
    } else {
        let d = dashboard.clone();
        EventListener::once(&window(), "load", move |_| d.schedule_startup_fetch()).forget();
    }
}

fn page_loaded() -> bool {
    document().ready_state() == "complete"
}
