//! Calendar helpers for history windows and provider timestamps.

use time::error::ComponentRange;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime};

/// Move `date` by `months` calendar months (negative goes back).
///
/// The day is clamped to the length of the target month, so
/// `2024-03-31` minus one month is `2024-02-29`.
pub fn shift_months(date: Date, months: i32) -> Result<Date, ComponentRange> {
    let index = i64::from(date.year()) * 12 + i64::from(u8::from(date.month()) - 1)
        + i64::from(months);
    let year = i32::try_from(index.div_euclid(12)).unwrap_or(i32::MAX);
    // rem_euclid(12) is always in 0..12
    let month = Month::try_from(index.rem_euclid(12) as u8 + 1)?;
    let day = date.day().min(month.length(year));
    Date::from_calendar_date(year, month, day)
}

/// Parse a timestamp as the utility provider formats it.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC), or a
/// bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_provider_date(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(parsed);
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(parsed.assume_utc());
    }
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.midnight().assume_utc())
}
