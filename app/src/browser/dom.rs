use gloo_utils::document;
use log::{error, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlButtonElement, HtmlElement, HtmlInputElement};

use crate::{
    dashboard::{DashboardView, ReadingDisplay, TestPostOutcome},
    last_updated::{LiveElements, TimedElement},
};

const LIVE_CLASS: &str = "last-updated";
const TIMESTAMP_ATTRIBUTE: &str = "title";
const HIDDEN_CLASS: &str = "d-none";
const SUCCESS_CLASS: &str = "text-success";
const FAILURE_CLASS: &str = "text-danger";

mod ids {
    pub(super) const TEMPERATURE: &str = "val_temp_c";
    pub(super) const HUMIDITY: &str = "val_humid_p";
    pub(super) const HEAT_INDEX: &str = "val_heatidx_c";
    pub(super) const DATA_AGE: &str = "val_age_ms";
    pub(super) const SENSOR_ERROR: &str = "sensdata_err";
    pub(super) const POLL_ENABLE: &str = "upd_enable";
    pub(super) const POLL_INTERVAL: &str = "upd_interv";
    pub(super) const REFRESH: &str = "upd_now";
    pub(super) const TESTPOST: &str = "testpost";
    pub(super) const TESTPOST_RESULT: &str = "testpost_result";
}

fn element_by_id<T: JsCast>(id: &str) -> Result<T, JsValue> {
    document()
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("no element with id {id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element {id} has an unexpected type")))
}

fn add_class(element: &Element, class: &str) {
    if let Err(e) = element.class_list().add_1(class) {
        warn!("Failed to add class {class}: {e:?}");
    }
}

fn remove_class(element: &Element, class: &str) {
    if let Err(e) = element.class_list().remove_1(class) {
        warn!("Failed to remove class {class}: {e:?}");
    }
}

pub(crate) struct DomTimedElement(HtmlElement);

impl TimedElement for DomTimedElement {
    fn timestamp(&self) -> Option<String> {
        self.0.get_attribute(TIMESTAMP_ATTRIBUTE)
    }

    fn set_text(&self, text: &str) {
        self.0.set_inner_text(text);
    }

    fn describe(&self) -> String {
        self.0.outer_html()
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct DomDocument;

impl LiveElements for DomDocument {
    type Element = DomTimedElement;

    fn live_elements(&self) -> Vec<DomTimedElement> {
        let nodes = match document().query_selector_all(&format!(".{LIVE_CLASS}")) {
            Ok(nodes) => nodes,
            Err(e) => {
                error!("Failed to look up live elements: {e:?}");
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .map(DomTimedElement)
            .collect()
    }
}

pub(crate) struct DomDashboardView {
    temperature: HtmlElement,
    humidity: HtmlElement,
    heat_index: HtmlElement,
    data_age: HtmlElement,
    sensor_error: HtmlElement,
    testpost_result: HtmlElement,
    pub(super) poll_enable: HtmlInputElement,
    pub(super) poll_interval: HtmlInputElement,
    pub(super) refresh: HtmlButtonElement,
    pub(super) testpost: HtmlButtonElement,
}

impl DomDashboardView {
    pub(crate) fn from_document() -> Result<Self, JsValue> {
        Ok(Self {
            temperature: element_by_id(ids::TEMPERATURE)?,
            humidity: element_by_id(ids::HUMIDITY)?,
            heat_index: element_by_id(ids::HEAT_INDEX)?,
            data_age: element_by_id(ids::DATA_AGE)?,
            sensor_error: element_by_id(ids::SENSOR_ERROR)?,
            testpost_result: element_by_id(ids::TESTPOST_RESULT)?,
            poll_enable: element_by_id(ids::POLL_ENABLE)?,
            poll_interval: element_by_id(ids::POLL_INTERVAL)?,
            refresh: element_by_id(ids::REFRESH)?,
            testpost: element_by_id(ids::TESTPOST)?,
        })
    }
}

impl DashboardView for DomDashboardView {
    fn has_focus(&self) -> bool {
        document().has_focus().unwrap_or(true)
    }

    fn polling_enabled(&self) -> bool {
        self.poll_enable.checked()
    }

    fn poll_interval_secs(&self) -> f64 {
        self.poll_interval.value_as_number()
    }

    fn set_refresh_disabled(&self, disabled: bool) {
        self.refresh.set_disabled(disabled);
    }

    fn show_reading(&self, reading: &ReadingDisplay) {
        self.temperature.set_inner_text(&reading.temperature);
        self.humidity.set_inner_text(&reading.humidity);
        self.heat_index.set_inner_text(&reading.heat_index);
        self.data_age.set_inner_text(&reading.measured_at);
        if let Err(e) = self
            .data_age
            .set_attribute(TIMESTAMP_ATTRIBUTE, &reading.measured_at)
        {
            warn!("Failed to set timestamp: {e:?}");
        }
        add_class(&self.data_age, LIVE_CLASS);
    }

    fn show_error(&self, message: &str) {
        self.sensor_error.set_inner_text(message);
        remove_class(&self.sensor_error, HIDDEN_CLASS);
    }

    fn hide_error(&self) {
        add_class(&self.sensor_error, HIDDEN_CLASS);
    }

    fn set_testpost_disabled(&self, disabled: bool) {
        self.testpost.set_disabled(disabled);
    }

    fn show_testpost(&self, outcome: &TestPostOutcome) {
        remove_class(&self.testpost_result, SUCCESS_CLASS);
        remove_class(&self.testpost_result, FAILURE_CLASS);
        self.testpost_result.set_inner_text(&outcome.message());
        match outcome {
            TestPostOutcome::Pending => {}
            TestPostOutcome::Succeeded(_) => add_class(&self.testpost_result, SUCCESS_CLASS),
            TestPostOutcome::Failed(_) => add_class(&self.testpost_result, FAILURE_CLASS),
        }
    }
}
