use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, TimeZone, Utc};

pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

pub fn ms_since_epoch() -> i64 {
    Utc::now().timestamp_millis()
}

/// Widest UTC offset in use, UTC-12 to UTC+14, in minutes.
pub const MAX_UTC_OFFSET_MIN: i32 = 14 * 60;

/// `[start, end)` of the `YYYY-MM-DD` day in ms since epoch, for a client
/// whose local time is `offset_min` minutes east of UTC.
pub fn day_bounds(date: &str, offset_min: i32) -> Result<(i64, i64)> {
    if offset_min.abs() > MAX_UTC_OFFSET_MIN {
        bail!("invalid UTC offset {offset_min} min");
    }
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("invalid date {date:?}, expected YYYY-MM-DD"))?;
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("no midnight on {date}"))?;
    let start = Utc.from_utc_datetime(&midnight).timestamp_millis()
        - i64::from(offset_min) * 60 * 1000;

    Ok((start, start + MS_PER_DAY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_cover_one_utc_day() {
        assert_eq!(
            day_bounds("2024-05-01", 0).unwrap(),
            (1_714_521_600_000, 1_714_608_000_000)
        );
    }

    #[test]
    fn day_bounds_follow_the_local_day() {
        // UTC+8: 2024-05-02 local starts at 2024-05-01T16:00Z
        assert_eq!(
            day_bounds("2024-05-02", 480).unwrap(),
            (1_714_579_200_000, 1_714_665_600_000)
        );
        // UTC-5: 2024-05-01 local starts at 2024-05-01T05:00Z
        assert_eq!(
            day_bounds("2024-05-01", -300).unwrap(),
            (1_714_539_600_000, 1_714_626_000_000)
        );
    }

    #[test]
    fn day_bounds_rejects_other_formats() {
        assert!(day_bounds("05/01/2024", 0).is_err());
        assert!(day_bounds("2024-02-30", 0).is_err());
        assert!(day_bounds("", 0).is_err());
        assert!(day_bounds("2024-05-01", 15 * 60).is_err());
    }
}
