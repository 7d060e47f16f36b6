use std::rc::Rc;

use js_sys::{Array, Intl, Object, Reflect};
use log::error;
use wasm_bindgen::JsValue;

use crate::last_updated::{
    FormatStyle, FormatterFactory, PlainFormatter, RelativeTimeFormat, TimeUnit,
};

/// `Intl.RelativeTimeFormat` with `numeric: "auto"`, giving "yesterday" rather than "1 day ago".
pub(crate) struct IntlFormatter(Intl::RelativeTimeFormat);

impl IntlFormatter {
    fn new(locale: &str, style: FormatStyle) -> Result<Self, JsValue> {
        let options = Object::new();
        Reflect::set(
            &options,
            &JsValue::from_str("style"),
            &JsValue::from_str(style.as_ref()),
        )?;
        Reflect::set(
            &options,
            &JsValue::from_str("numeric"),
            &JsValue::from_str("auto"),
        )?;
        let locales = Array::of1(&JsValue::from_str(locale));
        Ok(Self(Intl::RelativeTimeFormat::new(&locales, &options)))
    }
}

impl RelativeTimeFormat for IntlFormatter {
    fn format(&self, value: i64, unit: TimeUnit) -> String {
        self.0.format(value as f64, unit.as_ref()).into()
    }
}

pub(crate) struct IntlFormatters {
    locale: String,
}

impl IntlFormatters {
    pub(crate) fn new(locale: &str) -> Self {
        Self {
            locale: locale.into(),
        }
    }
}

impl FormatterFactory for IntlFormatters {
    fn relative_time(&self, style: FormatStyle) -> Rc<dyn RelativeTimeFormat> {
        match IntlFormatter::new(&self.locale, style) {
            Ok(formatter) => Rc::new(formatter),
            Err(e) => {
                error!("Intl.RelativeTimeFormat unavailable, falling back to plain English: {e:?}");
                Rc::new(PlainFormatter)
            }
        }
    }
}
