use calboard_core::{
  CalendarWidget,
  DisplayEvent,
  LocalTimeFormat,
  WidgetError,
  WidgetOptions
};
use chrono::{
  DateTime,
  Datelike,
  FixedOffset,
  NaiveDate,
  NaiveDateTime,
  Timelike
};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::Element;

#[wasm_bindgen]
extern "C" {
  #[wasm_bindgen(js_namespace = FullCalendar)]
  type Calendar;

  #[wasm_bindgen(
    constructor,
    catch,
    js_namespace = FullCalendar
  )]
  fn new(
    element: &Element,
    options: &JsValue
  ) -> Result<Calendar, JsValue>;

  #[wasm_bindgen(method, catch)]
  fn render(
    this: &Calendar
  ) -> Result<(), JsValue>;

  #[wasm_bindgen(
    method,
    js_name = removeAllEvents
  )]
  fn remove_all_events(this: &Calendar);

  #[wasm_bindgen(
    method,
    catch,
    js_name = addEventSource
  )]
  fn add_event_source(
    this: &Calendar,
    events: &JsValue
  ) -> Result<JsValue, JsValue>;
}

fn to_js<T: Serialize + ?Sized>(
  value: &T
) -> Result<JsValue, serde_wasm_bindgen::Error>
{
  value.serialize(
    &serde_wasm_bindgen::Serializer::json_compatible()
  )
}

/// Handle to the FullCalendar instance
/// loaded by the page's script tag.
pub struct FullCalendarWidget {
  calendar: Calendar
}

impl FullCalendarWidget {
  pub fn mount(
    element: &Element,
    options: &WidgetOptions
  ) -> Result<Self, WidgetError> {
    let options = to_js(options).map_err(
      |error| {
        WidgetError(format!(
          "failed encoding options: {error}"
        ))
      }
    )?;

    let calendar =
      Calendar::new(element, &options)
        .map_err(|error| {
          WidgetError(format!("{error:?}"))
        })?;

    Ok(Self { calendar })
  }
}

impl CalendarWidget for FullCalendarWidget {
  fn render(&mut self) {
    if let Err(error) = self.calendar.render()
    {
      tracing::error!(
        ?error,
        "calendar render failed"
      );
    }
  }

  fn remove_all_events(&mut self) {
    self.calendar.remove_all_events();
  }

  fn add_event_source(
    &mut self,
    events: &[DisplayEvent]
  ) {
    let source = match to_js(events) {
      | Ok(source) => source,
      | Err(error) => {
        tracing::error!(
          %error,
          "failed encoding calendar events"
        );
        return;
      }
    };

    if let Err(error) =
      self.calendar.add_event_source(&source)
    {
      tracing::error!(
        ?error,
        "calendar rejected event source"
      );
    }
  }
}

/// Formats through `Date.toLocale*`, so
/// the sidebar follows the browser's
/// locale and time zone.
pub struct BrowserLocaleFormat;

impl LocalTimeFormat for BrowserLocaleFormat {
  fn format_instant(
    &self,
    instant: &DateTime<FixedOffset>
  ) -> String {
    let date = js_sys::Date::new(
      &JsValue::from_f64(
        instant.timestamp_millis() as f64
      )
    );
    String::from(date.to_locale_string(
      "default",
      &JsValue::UNDEFINED
    ))
  }

  fn format_wall_clock(
    &self,
    local: &NaiveDateTime
  ) -> String {
    let date =
      js_sys::Date::new_with_year_month_day_hr_min_sec(
        u32::try_from(local.year())
          .unwrap_or_default(),
        local.month0() as i32,
        local.day() as i32,
        local.hour() as i32,
        local.minute() as i32,
        local.second() as i32
      );
    String::from(date.to_locale_string(
      "default",
      &JsValue::UNDEFINED
    ))
  }

  // Local midnight of the day, so the
  // shown date never shifts by zone.
  fn format_date(
    &self,
    date: NaiveDate
  ) -> String {
    let local =
      js_sys::Date::new_with_year_month_day(
        u32::try_from(date.year())
          .unwrap_or_default(),
        date.month0() as i32,
        date.day() as i32
      );
    String::from(local.to_locale_date_string(
      "default",
      &JsValue::UNDEFINED
    ))
  }
}
