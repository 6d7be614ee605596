use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::page::Page;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowPayload {
    pub artist_id: String,
    pub venue_id: String,
    pub start_time: String,
}

impl ShowPayload {
    pub fn from_page(page: &Page) -> Result<Self, DispatchError> {
        Ok(ShowPayload {
            artist_id: page.value("artist_id")?,
            venue_id: page.value("venue_id")?,
            start_time: page.value("start_time")?,
        })
    }

    pub fn start_time_utc(&self) -> Option<DateTime<Utc>> {
        parse_iso_string(&self.start_time)
    }
}

/// Read an ISO-like timestamp as UTC by taking its numeric fields in order:
/// year, month, day, hour, minute, second, milliseconds.
///
/// Any non-digit run separates fields, so `2019-05-21T21:30:00.000Z` and
/// `2019-05-21 21:30` both parse. Year, month and day are required; the
/// remaining fields default to zero. Offsets are not applied.
pub fn parse_iso_string(s: &str) -> Option<DateTime<Utc>> {
    let fields: Vec<&str> = s
        .split(|c: char| !c.is_ascii_digit())
        .filter(|field| !field.is_empty())
        .collect();
    if fields.len() < 3 {
        return None;
    }

    let field = |index: usize| -> Option<u32> {
        fields.get(index).map_or(Some(0), |f| f.parse().ok())
    };
    let year: i32 = fields[0].parse().ok()?;
    let millis: i64 = fields
        .get(6)
        .map_or(Some(0), |f| f.get(..3).unwrap_or(*f).parse().ok())?;

    let time = Utc
        .with_ymd_and_hms(year, field(1)?, field(2)?, field(3)?, field(4)?, field(5)?)
        .single()?;
    Some(time + Duration::milliseconds(millis))
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn parses_full_timestamp() {
        let time = parse_iso_string("2019-05-21T21:30:00.000Z").unwrap();
        assert_eq!((time.year(), time.month(), time.day()), (2019, 5, 21));
        assert_eq!((time.hour(), time.minute(), time.second()), (21, 30, 0));
    }

    #[test]
    fn parses_form_style_timestamp() {
        let time = parse_iso_string("2035-04-01 20:00").unwrap();
        assert_eq!(time.to_rfc3339(), "2035-04-01T20:00:00+00:00");
    }

    #[test]
    fn keeps_milliseconds() {
        let time = parse_iso_string("2019-06-15T23:00:00.250Z").unwrap();
        assert_eq!(time.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn rejects_partial_or_invalid_dates() {
        assert!(parse_iso_string("").is_none());
        assert!(parse_iso_string("2019-05").is_none());
        assert!(parse_iso_string("2019-13-01").is_none());
    }
}
