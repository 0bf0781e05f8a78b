use chrono::{NaiveDate, NaiveDateTime};

use crate::timetable::{DayRecord, Location};

const DAY_MILLIS: i64 = 86_400_000;

/// The fixed calendar boundary of the observed month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CampaignWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl CampaignWindow {
    /// Returns `None` unless `start` is strictly before `end`.
    #[must_use]
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Ramadan 2026: 19 February 00:00:00 through 20 March 23:59:59, local time.
    #[must_use]
    pub fn ramadan_2026() -> Self {
        let start = NaiveDate::from_ymd_opt(2026, 2, 19).and_then(|d| d.and_hms_opt(0, 0, 0));
        let end = NaiveDate::from_ymd_opt(2026, 3, 20).and_then(|d| d.and_hms_opt(23, 59, 59));
        match start.zip(end).and_then(|(start, end)| Self::new(start, end)) {
            Some(window) => window,
            None => unreachable!("ramadan 2026 bounds are valid calendar dates"),
        }
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Maps `now` onto the campaign.
    ///
    /// The day index is counted in whole 24 hour periods from the start, the
    /// record falls back to the first day if the table has no exact match.
    #[must_use]
    pub fn resolve(&self, now: NaiveDateTime, location: &'static Location) -> Status {
        if now < self.start {
            let millis = (self.start - now).num_milliseconds().unsigned_abs();
            Status::Before {
                days_remaining: millis.div_ceil(DAY_MILLIS.unsigned_abs()),
            }
        } else if now > self.end {
            Status::After
        } else {
            let elapsed = (now - self.start).num_milliseconds() / DAY_MILLIS;
            let day = u8::try_from(elapsed + 1).unwrap_or(u8::MAX);
            Status::During {
                day,
                record: location.day(day).unwrap_or_else(|| location.first_day()),
            }
        }
    }
}

impl Default for CampaignWindow {
    fn default() -> Self {
        Self::ramadan_2026()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Before { days_remaining: u64 },
    During { day: u8, record: &'static DayRecord },
    After,
}

impl Status {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::During { .. })
    }

    #[must_use]
    pub const fn record(&self) -> Option<&'static DayRecord> {
        match self {
            Self::During { record, .. } => Some(*record),
            _ => None,
        }
    }

    /// the calendar badge shown next to the date
    #[must_use]
    pub fn badge(&self) -> String {
        match self {
            Self::Before { days_remaining } => format!("STARTS IN {days_remaining}D"),
            Self::During { day, .. } => format!("DAY {day}"),
            Self::After => "COMPLETED".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::timetable::LocationId;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn rejects_inverted_window() {
        let a = at(2026, 2, 19, 0, 0, 0);
        assert!(CampaignWindow::new(a, a).is_none());
        assert!(CampaignWindow::new(a + Duration::days(1), a).is_none());
        assert!(CampaignWindow::new(a, a + Duration::days(1)).is_some());
    }

    #[test]
    fn before_counts_down_at_midnight() {
        let window = CampaignWindow::ramadan_2026();
        let wahi = LocationId::Wahi.location();
        assert_eq!(
            window.resolve(at(2026, 2, 17, 23, 59, 59), wahi),
            Status::Before { days_remaining: 2 }
        );
        assert_eq!(
            window.resolve(at(2026, 2, 18, 0, 0, 0), wahi),
            Status::Before { days_remaining: 1 }
        );
        assert_eq!(
            window.resolve(at(2026, 2, 18, 23, 59, 59), wahi),
            Status::Before { days_remaining: 1 }
        );

        // strictly decreasing by one per local day until the start
        let mut previous = u64::MAX;
        let mut now = at(2026, 1, 1, 12, 0, 0);
        while now < window.start() {
            let Status::Before { days_remaining } = window.resolve(now, wahi) else {
                panic!("expected before at {now}");
            };
            assert!(days_remaining > 0);
            assert!(days_remaining == previous - 1 || previous == u64::MAX);
            previous = days_remaining;
            now += Duration::days(1);
        }
    }

    #[test]
    fn during_day_index_increases_daily() {
        let window = CampaignWindow::ramadan_2026();
        let wahi = LocationId::Wahi.location();
        let mut now = window.start();
        let mut expected = 1;
        while now <= window.end() {
            for offset in [0, 6, 12, 23] {
                let sample = now + Duration::hours(offset);
                match window.resolve(sample, wahi) {
                    Status::During { day, record } => {
                        assert_eq!(day, expected);
                        assert_eq!(record.day, expected);
                    }
                    other => panic!("expected during at {sample}, got {other:?}"),
                }
            }
            expected += 1;
            now += Duration::days(1);
        }
        assert_eq!(expected, 31);
    }

    #[test]
    fn after_the_last_second() {
        let window = CampaignWindow::ramadan_2026();
        let wahi = LocationId::Wahi.location();
        assert!(window.resolve(at(2026, 3, 20, 23, 59, 59), wahi).is_active());
        assert_eq!(window.resolve(at(2026, 3, 21, 0, 0, 0), wahi), Status::After);
    }

    #[test]
    fn badges() {
        let wahi = LocationId::Wahi.location();
        assert_eq!(Status::Before { days_remaining: 3 }.badge(), "STARTS IN 3D");
        assert_eq!(
            Status::During {
                day: 4,
                record: wahi.day(4).unwrap()
            }
            .badge(),
            "DAY 4"
        );
        assert_eq!(Status::After.badge(), "COMPLETED");
    }

    #[test]
    fn short_window_falls_back_to_first_record() {
        let start = at(2026, 1, 1, 0, 0, 0);
        let window = CampaignWindow::new(start, start + Duration::days(40)).unwrap();
        let wahi = LocationId::Wahi.location();
        match window.resolve(start + Duration::days(35), wahi) {
            Status::During { day, record } => {
                assert_eq!(day, 36);
                assert_eq!(record.day, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
