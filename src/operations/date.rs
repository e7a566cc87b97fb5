use crate::error::ParseError;
use chrono::NaiveDate;

/// Raw year, month and day as typed at the prompt.
#[derive(Debug, Clone, Copy)]
pub struct RawDate<'a> {
    pub year: &'a str,
    pub month: &'a str,
    pub day: &'a str,
}

/// Resolves the date of a purchase.
///
/// `today` comes from the caller's clock, so `use_today` returns it as is and
/// ignores `raw` entirely.
pub fn resolve_date(
    today: NaiveDate,
    use_today: bool,
    raw: Option<RawDate>,
) -> Result<NaiveDate, ParseError> {
    if use_today {
        return Ok(today);
    }
    let raw = raw.ok_or_else(|| ParseError::InvalidDate("no date provided".to_string()))?;
    let (year, month, day) = parse_date_parts(raw)?;
    build_date(year, month, day)
}

/// Parses the three components as integers without checking the calendar.
pub fn parse_date_parts(raw: RawDate) -> Result<(i32, u32, u32), ParseError> {
    let year = parse_component("year", raw.year)?;
    let month = parse_component("month", raw.month)?;
    let day = parse_component("day", raw.day)?;
    Ok((year, month, day))
}

pub fn build_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, ParseError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ParseError::InvalidDate(format!("{year}-{month:02}-{day:02} is not a calendar date"))
    })
}

fn parse_component<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ParseError> {
    let value = value.trim();
    value
        .parse::<T>()
        .map_err(|_| ParseError::InvalidDate(format!("{name} '{value}' is not an integer")))
}
