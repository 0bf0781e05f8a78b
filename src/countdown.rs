use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{
    campaign::Status,
    timetable::{Convention, DayRecord, TimeOfDay},
};

pub const IFTAR_DUA: &str = "Dua: Allahumma inni laka sumtu";

/// which part of the day the countdown is in, used for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Waiting,
    Sehri,
    Fasting,
    Iftar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    pub label: &'static str,
    pub time: String,
    pub message: String,
    pub phase: Phase,
    /// the instant being counted down to, if any
    pub target: Option<NaiveDateTime>,
    pub remaining: u64,
}

impl Countdown {
    fn waiting() -> Self {
        Self {
            label: "RAMADAN 2026",
            time: format_hms(0),
            message: "Starts Feb 19".to_string(),
            phase: Phase::Waiting,
            target: None,
            remaining: 0,
        }
    }
}

/// Today's Sehri and Iftar instants for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Targets {
    pub sehri: NaiveDateTime,
    pub iftar: NaiveDateTime,
}

impl Targets {
    #[must_use]
    pub fn new(record: &DayRecord, date: NaiveDate, convention: Convention) -> Self {
        let sehri = record.sehri.get(convention).at(TimeOfDay::AM);
        let iftar = record.iftar.get(convention).at(TimeOfDay::PM);
        Self {
            sehri: date.and_time(sehri.unwrap_or_default()),
            iftar: date.and_time(iftar.unwrap_or_default()),
        }
    }
}

/// Works out what to count down to at `now`.
#[must_use]
pub fn countdown(status: &Status, now: NaiveDateTime, convention: Convention) -> Countdown {
    let Some(record) = status.record() else {
        return Countdown::waiting();
    };
    let targets = Targets::new(record, now.date(), convention);
    if now < targets.sehri {
        let remaining = seconds_until(now, targets.sehri);
        Countdown {
            label: "TO SEHRI",
            time: format_hms(remaining),
            message: format!("Sehri at {} AM", record.sehri.get(convention)),
            phase: Phase::Sehri,
            target: Some(targets.sehri),
            remaining,
        }
    } else if now < targets.iftar {
        let remaining = seconds_until(now, targets.iftar);
        Countdown {
            label: "TO IFTAR",
            time: format_hms(remaining),
            message: format!("Iftar at {} PM", record.iftar.get(convention)),
            phase: Phase::Fasting,
            target: Some(targets.iftar),
            remaining,
        }
    } else {
        Countdown {
            label: "IFTAR TIME",
            time: format_hms(0),
            message: IFTAR_DUA.to_string(),
            phase: Phase::Iftar,
            target: None,
            remaining: 0,
        }
    }
}

// whole seconds, rounded down
fn seconds_until(now: NaiveDateTime, target: NaiveDateTime) -> u64 {
    u64::try_from((target - now).num_seconds()).unwrap_or(0)
}

#[must_use]
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Inverse of [`format_hms`].
#[must_use]
pub fn parse_hms(text: &str) -> Option<u64> {
    let mut parts = text.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    Some(hours * 3600 + minutes * 60 + seconds)
}

/// How much of the night is left for Sehri after the wake alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeWindow {
    Remaining { hours: i64, minutes: i64 },
    Missed,
}

impl WakeWindow {
    #[must_use]
    pub fn new(sehri: NaiveDateTime, wake_at: NaiveTime) -> Self {
        let wake = sehri.date().and_time(wake_at);
        let seconds = (sehri - wake).num_seconds();
        if seconds <= 0 {
            Self::Missed
        } else {
            Self::Remaining {
                hours: seconds / 3600,
                minutes: (seconds % 3600) / 60,
            }
        }
    }
}

impl fmt::Display for WakeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remaining { hours, minutes } => {
                write!(f, "{hours}h {minutes}m remaining for Sehri")
            }
            Self::Missed => write!(f, "Wake up after Sehri ends!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::LocationId;

    fn day_one(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 19)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn during_day_one() -> Status {
        Status::During {
            day: 1,
            record: LocationId::Wahi.location().first_day(),
        }
    }

    #[test]
    fn formats_fields_independently() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(86_399), "23:59:59");
        assert_eq!(format_hms(360_000), "100:00:00");
    }

    #[test]
    fn format_is_recoverable_below_one_hundred_hours() {
        let mut seen = std::collections::HashSet::new();
        for seconds in (0..360_000).step_by(7).chain([359_999]) {
            let text = format_hms(seconds);
            assert_eq!(parse_hms(&text), Some(seconds));
            assert!(seen.insert(text));
        }
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_hms("00:60:00"), None);
        assert_eq!(parse_hms("00:00"), None);
        assert_eq!(parse_hms("00:00:00:00"), None);
        assert_eq!(parse_hms("aa:00:00"), None);
    }

    #[test]
    fn targets_use_am_and_pm() {
        let record = LocationId::Wahi.location().first_day();
        let date = day_one(0, 0, 0).date();
        let hanafi = Targets::new(record, date, Convention::Hanafi);
        assert_eq!(hanafi.sehri, day_one(5, 44, 0));
        assert_eq!(hanafi.iftar, day_one(18, 24, 0));
        let jafri = Targets::new(record, date, Convention::Jafri);
        assert_eq!(jafri.sehri, day_one(5, 34, 0));
        assert_eq!(jafri.iftar, day_one(18, 34, 0));
    }

    #[test]
    fn sehri_then_fasting_then_iftar() {
        let status = during_day_one();
        let before = countdown(&status, day_one(5, 43, 59), Convention::Hanafi);
        assert_eq!(before.label, "TO SEHRI");
        assert_eq!(before.time, "00:00:01");
        assert_eq!(before.message, "Sehri at 05:44 AM");
        assert_eq!(before.phase, Phase::Sehri);

        let fasting = countdown(&status, day_one(5, 44, 0), Convention::Hanafi);
        assert_eq!(fasting.label, "TO IFTAR");
        assert_eq!(fasting.time, "12:40:00");
        assert_eq!(fasting.message, "Iftar at 06:24 PM");
        assert_eq!(fasting.target, Some(day_one(18, 24, 0)));

        let iftar = countdown(&status, day_one(18, 24, 0), Convention::Hanafi);
        assert_eq!(iftar.label, "IFTAR TIME");
        assert_eq!(iftar.time, "00:00:00");
        assert_eq!(iftar.message, IFTAR_DUA);
        assert_eq!(iftar.phase, Phase::Iftar);
        assert_eq!(iftar.target, None);
    }

    #[test]
    fn remaining_rounds_down() {
        let status = during_day_one();
        let now = day_one(5, 43, 58) + chrono::Duration::milliseconds(500);
        assert_eq!(countdown(&status, now, Convention::Hanafi).remaining, 1);
    }

    #[test]
    fn outside_the_month_waits() {
        let waiting = countdown(&Status::After, day_one(12, 0, 0), Convention::Hanafi);
        assert_eq!(waiting.label, "RAMADAN 2026");
        assert_eq!(waiting.time, "00:00:00");
        assert_eq!(waiting.phase, Phase::Waiting);
    }

    #[test]
    fn wake_window() {
        let sehri = day_one(5, 44, 0);
        let four = NaiveTime::from_hms_opt(4, 0, 0).unwrap();
        assert_eq!(
            WakeWindow::new(sehri, four),
            WakeWindow::Remaining {
                hours: 1,
                minutes: 44
            }
        );
        assert_eq!(
            WakeWindow::new(sehri, four).to_string(),
            "1h 44m remaining for Sehri"
        );
        let late = NaiveTime::from_hms_opt(5, 44, 0).unwrap();
        assert_eq!(WakeWindow::new(sehri, late), WakeWindow::Missed);
        assert_eq!(WakeWindow::Missed.to_string(), "Wake up after Sehri ends!");
    }
}
