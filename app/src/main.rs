use std::rc::Rc;

use browser::{BrowserEventLoop, DomDashboardView, DomDocument, HttpDevice, IntlFormatters};
use config::DashboardConfig;
use dashboard::Dashboard;
use platform::SystemClock;
use wasm_bindgen::prelude::*;

mod browser;
mod config;
mod dashboard;
mod last_updated;
mod platform;
#[cfg(test)]
mod testing;

pub fn main() -> Result<(), JsValue> {
    browser_panic_hook::set_once_default();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));

    let window = gloo_utils::window();
    let config = DashboardConfig::from_page_url(&window.location().href()?);
    let view = Rc::new(DomDashboardView::from_document()?);
    let narrow = window.match_media(&config.narrow_media_query)?;

    let dashboard = Dashboard::new(
        config.clone(),
        view.clone(),
        Rc::new(HttpDevice::new(&config)),
        DomDocument,
        BrowserEventLoop,
        Rc::new(SystemClock),
        Rc::new(IntlFormatters::new(&config.locale)),
    );
    dashboard.start(narrow.as_ref().map_or(false, |query| query.matches()));
    browser::attach(&dashboard, &view, narrow);
    Ok(())
}
