use chrono::{DateTime, Local, NaiveDate, Offset, TimeZone, Utc};

pub fn utc_from_millis(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
}

/// `MM/DD/YYYY hh:mm AM` in local time.
pub fn format_timestamp(ms: i64) -> String {
    DateTime::<Local>::from(utc_from_millis(ms))
        .format("%m/%d/%Y %I:%M %p")
        .to_string()
}

pub fn chart_timestamp(ms: i64) -> String {
    DateTime::<Local>::from(utc_from_millis(ms))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Minutes east of UTC of local time at the start of `date`.
pub fn utc_offset_min(date: NaiveDate) -> i32 {
    let offset = date
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| Local.from_local_datetime(&midnight).earliest())
        .map_or_else(|| Local::now().offset().fix(), |dt| dt.offset().fix());
    offset.local_minus_utc() / 60
}

/// Browser clock in ms since epoch.
pub fn now_millis() -> f64 {
    js_sys::Date::now()
}
