//! Translation of create-event slot values into a calendar event.
//!
//! Slots arrive as free strings (`day`, `month`, `hour`, `minute`, `title`).
//! They are validated into an [`EventDraft`], which is then placed in the
//! skill time zone as a one-hour event.

use chrono::{DateTime, Datelike, Duration, NaiveDate, SecondsFormat, TimeZone, Utc};

use crate::calendar::{CalendarEvent, EventDateTime};
use crate::config::SKILL_TIME_ZONE;
use crate::models::Intent;
use crate::{Error, Result};

pub const SLOT_DAY: &str = "day";
pub const SLOT_MONTH: &str = "month";
pub const SLOT_HOUR: &str = "hour";
pub const SLOT_MINUTE: &str = "minute";
pub const SLOT_TITLE: &str = "title";

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Events always last one hour.
const EVENT_DURATION_HOURS: i64 = 1;

/// Validated slot values of a create-event request.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub day: u32,
    /// Month number, 1 through 12
    pub month: u32,
    pub hour: u32,
    pub minute: u32,
    pub title: String,
}

impl EventDraft {
    /// Validate raw slot values.
    pub fn from_slots(
        day: Option<&str>,
        month: Option<&str>,
        hour: Option<&str>,
        minute: Option<&str>,
        title: Option<&str>,
    ) -> Result<Self> {
        let day = parse_in_range(SLOT_DAY, day, 1, 31)?;
        let month = parse_month(required(SLOT_MONTH, month)?)?;
        let hour = parse_in_range(SLOT_HOUR, hour, 0, 23)?;
        let minute = parse_in_range(SLOT_MINUTE, minute, 0, 59)?;
        let title = required(SLOT_TITLE, title)?.to_string();

        Ok(Self {
            day,
            month,
            hour,
            minute,
            title,
        })
    }

    /// Validate the slots of a create-event intent.
    pub fn from_intent(intent: &Intent) -> Result<Self> {
        Self::from_slots(
            intent.slot_value(SLOT_DAY),
            intent.slot_value(SLOT_MONTH),
            intent.slot_value(SLOT_HOUR),
            intent.slot_value(SLOT_MINUTE),
            intent.slot_value(SLOT_TITLE),
        )
    }

    /// Build the calendar event for this draft in `year`.
    pub fn to_calendar_event(&self, year: i32) -> Result<CalendarEvent> {
        let naive = NaiveDate::from_ymd_opt(year, self.month, self.day)
            .ok_or_else(|| {
                Error::Validation(format!(
                    "{:04}-{:02}-{:02} is not a valid date",
                    year, self.month, self.day
                ))
            })?
            .and_hms_opt(self.hour, self.minute, 0)
            .ok_or_else(|| {
                Error::Validation(format!("Invalid time {:02}:{:02}", self.hour, self.minute))
            })?;

        let start = SKILL_TIME_ZONE
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| {
                Error::Validation(format!("{} does not exist in {}", naive, SKILL_TIME_ZONE.name()))
            })?;
        let end = start + Duration::hours(EVENT_DURATION_HOURS);

        Ok(CalendarEvent {
            summary: self.title.clone(),
            start: event_time(start.to_rfc3339_opts(SecondsFormat::Millis, false)),
            end: event_time(end.to_rfc3339_opts(SecondsFormat::Millis, false)),
        })
    }
}

/// Year used for slot dates, which carry no year of their own: the current
/// year in the skill time zone.
pub fn resolve_year(now: DateTime<Utc>) -> i32 {
    now.with_timezone(&SKILL_TIME_ZONE).year()
}

fn event_time(date_time: String) -> EventDateTime {
    EventDateTime {
        date_time,
        time_zone: SKILL_TIME_ZONE.name().to_string(),
    }
}

fn required<'a>(slot: &str, value: Option<&'a str>) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Validation(format!("Missing value for slot '{}'", slot)))
}

fn parse_in_range(slot: &str, value: Option<&str>, min: u32, max: u32) -> Result<u32> {
    let raw = required(slot, value)?;
    let parsed: u32 = raw
        .parse()
        .map_err(|_| Error::Validation(format!("Slot '{}' is not a number: '{}'", slot, raw)))?;

    if parsed < min || parsed > max {
        return Err(Error::Validation(format!(
            "Slot '{}' out of range [{}, {}]: {}",
            slot, min, max, parsed
        )));
    }
    Ok(parsed)
}

fn parse_month(raw: &str) -> Result<u32> {
    let lower = raw.to_ascii_lowercase();
    MONTH_ABBREVIATIONS
        .iter()
        .position(|abbr| *abbr == lower)
        .map(|index| index as u32 + 1)
        .ok_or_else(|| Error::Validation(format!("Unrecognized month abbreviation: '{}'", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(day: &str, month: &str, hour: &str, minute: &str) -> Result<EventDraft> {
        EventDraft::from_slots(Some(day), Some(month), Some(hour), Some(minute), Some("Standup"))
    }

    #[test]
    fn test_standup_event() {
        let event = draft("15", "Jan", "10", "0")
            .unwrap()
            .to_calendar_event(2026)
            .unwrap();

        assert_eq!(event.summary, "Standup");
        assert_eq!(event.start.date_time, "2026-01-15T10:00:00.000-03:00");
        assert_eq!(event.end.date_time, "2026-01-15T11:00:00.000-03:00");
        assert_eq!(event.start.time_zone, "America/Sao_Paulo");
        assert_eq!(event.end.time_zone, "America/Sao_Paulo");
    }

    #[test]
    fn test_end_rolls_over_midnight() {
        let event = draft("31", "dec", "23", "30")
            .unwrap()
            .to_calendar_event(2026)
            .unwrap();
        assert_eq!(event.start.date_time, "2026-12-31T23:30:00.000-03:00");
        assert_eq!(event.end.date_time, "2027-01-01T00:30:00.000-03:00");
    }

    #[test]
    fn test_month_case_insensitive() {
        assert_eq!(draft("1", "SEP", "8", "05").unwrap().month, 9);
        assert_eq!(draft("1", "sep", "8", "05").unwrap().minute, 5);
    }

    #[test]
    fn test_unknown_month() {
        assert!(matches!(draft("15", "Xyz", "10", "0"), Err(Error::Validation(_))));
        assert!(matches!(draft("15", "January", "10", "0"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_out_of_range_values() {
        assert!(matches!(draft("15", "Jan", "25", "0"), Err(Error::Validation(_))));
        assert!(matches!(draft("0", "Jan", "10", "0"), Err(Error::Validation(_))));
        assert!(matches!(draft("32", "Jan", "10", "0"), Err(Error::Validation(_))));
        assert!(matches!(draft("15", "Jan", "10", "60"), Err(Error::Validation(_))));
        assert!(matches!(draft("15", "Jan", "ten", "0"), Err(Error::Validation(_))));
        assert!(matches!(draft("15", "Jan", "-1", "0"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_missing_slots() {
        let err = EventDraft::from_slots(Some("15"), Some("Jan"), Some("10"), None, Some("Standup"))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg.contains("minute")));

        let err = EventDraft::from_slots(Some("15"), Some("Jan"), Some("10"), Some("0"), Some("  "))
            .unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg.contains("title")));
    }

    #[test]
    fn test_day_must_exist_in_month() {
        let april = draft("31", "Apr", "10", "0").unwrap();
        assert!(matches!(april.to_calendar_event(2026), Err(Error::Validation(_))));

        let leap = draft("29", "Feb", "10", "0").unwrap();
        assert!(leap.to_calendar_event(2028).is_ok());
        assert!(matches!(leap.to_calendar_event(2026), Err(Error::Validation(_))));
    }

    #[test]
    fn test_month_outside_calendar_rejected() {
        for month in [0, 13] {
            let draft = EventDraft {
                month,
                ..draft("15", "Jan", "10", "0").unwrap()
            };
            assert!(matches!(draft.to_calendar_event(2026), Err(Error::Validation(_))));
        }
    }

    #[test]
    fn test_dst_gap_rejected() {
        // Clocks in Sao Paulo jumped from 00:00 to 01:00 on 4 November 2018.
        let draft = draft("4", "Nov", "0", "30").unwrap();
        assert!(matches!(draft.to_calendar_event(2018), Err(Error::Validation(_))));
    }

    #[test]
    fn test_resolve_year_uses_skill_zone() {
        // 01:00 UTC on New Year's Day is still 31 December in Sao Paulo.
        let now = Utc.with_ymd_and_hms(2027, 1, 1, 1, 0, 0).unwrap();
        assert_eq!(resolve_year(now), 2026);

        let now = Utc.with_ymd_and_hms(2027, 1, 1, 4, 0, 0).unwrap();
        assert_eq!(resolve_year(now), 2027);
    }
}
