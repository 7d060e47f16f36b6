use dht22_dashboard_shared::{SENSOR_PATH, TESTPOST_PATH};
use log::warn;
use url::Url;

/// Query parameter pointing the dashboard at a device other than the one serving the page.
const DEVICE_PARAMETER: &str = "device";

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct DashboardConfig {
    pub(crate) device: Option<Url>,
    pub(crate) sensor_path: String,
    pub(crate) testpost_path: String,
    pub(crate) sensor_timeout_ms: u32,
    pub(crate) testpost_timeout_ms: u32,
    pub(crate) live_refresh_ms: u32,
    pub(crate) startup_delay_ms: u32,
    pub(crate) narrow_media_query: String,
    pub(crate) locale: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            device: None,
            sensor_path: SENSOR_PATH.into(),
            testpost_path: TESTPOST_PATH.into(),
            sensor_timeout_ms: 4000,
            testpost_timeout_ms: 8000,
            live_refresh_ms: 500,
            startup_delay_ms: 2000,
            // same breakpoint as the stylesheet
            narrow_media_query: "only screen and (max-width: 720px)".into(),
            locale: "en".into(),
        }
    }
}

impl DashboardConfig {
    pub(crate) fn from_page_url(href: &str) -> Self {
        let device = Url::parse(href).ok().and_then(|page| {
            let (_, value) = page
                .query_pairs()
                .find(|(key, _)| *key == DEVICE_PARAMETER)?;
            match Url::parse(&value) {
                Ok(device) => Some(device),
                Err(e) => {
                    warn!("Ignoring device {value:?}: {e}");
                    None
                }
            }
        });
        Self {
            device,
            ..Default::default()
        }
    }

    pub(crate) fn sensor_url(&self) -> String {
        self.endpoint(&self.sensor_path)
    }

    pub(crate) fn testpost_url(&self) -> String {
        self.endpoint(&self.testpost_path)
    }

    fn endpoint(&self, path: &str) -> String {
        match self.device.as_ref().map(|device| device.join(path)) {
            Some(Ok(url)) => url.into(),
            _ => path.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn defaults_to_same_origin_endpoints() {
        let config = DashboardConfig::from_page_url("http://192.168.4.1/");
        assert_eq!(config.device, None);
        assert_eq!(config.sensor_url(), "/sensor.json");
        assert_eq!(config.testpost_url(), "/testpost");
        assert_eq!(config.sensor_timeout_ms, 4000);
        assert_eq!(config.testpost_timeout_ms, 8000);
    }

    #[test]
    pub fn device_parameter_overrides_origin() {
        let config = DashboardConfig::from_page_url(
            "http://localhost:8080/index.html?device=http%3A%2F%2Flocalhost%3A3000",
        );
        assert_eq!(config.sensor_url(), "http://localhost:3000/sensor.json");
        assert_eq!(config.testpost_url(), "http://localhost:3000/testpost");
    }

    #[test]
    pub fn ignores_invalid_device() {
        let config = DashboardConfig::from_page_url("http://localhost:8080/?device=not%20a%20url");
        assert_eq!(config, DashboardConfig::default());
    }
}
