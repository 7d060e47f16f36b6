use async_trait::async_trait;
use dht22_dashboard_shared::SensorReading;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortSignal, DomException, Headers, Request, RequestInit, Response};

use crate::{
    config::DashboardConfig,
    dashboard::{decode_reading, DeviceApi, FetchError},
};

/// Talks to the device through `fetch`, every request aborts after its timeout.
pub(crate) struct HttpDevice {
    sensor_url: String,
    testpost_url: String,
    sensor_timeout_ms: u32,
    testpost_timeout_ms: u32,
}

impl HttpDevice {
    pub(crate) fn new(config: &DashboardConfig) -> Self {
        Self {
            sensor_url: config.sensor_url(),
            testpost_url: config.testpost_url(),
            sensor_timeout_ms: config.sensor_timeout_ms,
            testpost_timeout_ms: config.testpost_timeout_ms,
        }
    }
}

#[async_trait(?Send)]
impl DeviceApi for HttpDevice {
    async fn sensor_reading(&self) -> Result<SensorReading, FetchError> {
        let opts = RequestInit::new();
        opts.set_method("GET");
        opts.set_signal(Some(&AbortSignal::timeout_with_u32(self.sensor_timeout_ms)));

        let resp = send(&self.sensor_url, &opts).await?;
        decode_reading(&text(&resp).await?)
    }

    async fn test_post(&self, body: &str) -> Result<String, FetchError> {
        let headers = Headers::new().map_err(classify)?;
        headers
            .set("Content-Type", "application/octet-stream")
            .map_err(classify)?;
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_headers(&headers);
        opts.set_body(&JsValue::from_str(body));
        opts.set_signal(Some(&AbortSignal::timeout_with_u32(
            self.testpost_timeout_ms,
        )));

        let resp = send(&self.testpost_url, &opts).await?;
        text(&resp).await
    }
}

async fn send(url: &str, opts: &RequestInit) -> Result<Response, FetchError> {
    let request = Request::new_with_str_and_init(url, opts).map_err(classify)?;

    let window = gloo_utils::window();
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(classify)?;
    let resp: Response = resp_value.dyn_into().map_err(classify)?;
    if !resp.ok() {
        return Err(FetchError::Status(resp.status()));
    }
    Ok(resp)
}

async fn text(resp: &Response) -> Result<String, FetchError> {
    let text = JsFuture::from(resp.text().map_err(classify)?)
        .await
        .map_err(classify)?;
    text.as_string()
        .ok_or_else(|| FetchError::Body("response body is not text".into()))
}

/// Aborted requests surface as `AbortError` or, from `AbortSignal.timeout`, `TimeoutError`.
fn classify(error: JsValue) -> FetchError {
    if let Some(exception) = error.dyn_ref::<DomException>() {
        let name = exception.name();
        let message = format!("{name}: {}", exception.message());
        return match name.as_str() {
            "AbortError" | "TimeoutError" => FetchError::Timeout(message),
            _ => FetchError::Network(message),
        };
    }
    if let Some(error) = error.dyn_ref::<js_sys::Error>() {
        return FetchError::Network(String::from(error.to_string()));
    }
    FetchError::Network(format!("{error:?}"))
}
