//! Static Sehri/Iftar tables for the supported locations.
//!
//! Times are stored the way they are printed on the community timetable:
//! twelve hour clock values without a meridiem. Sehri is always read as AM
//! and Iftar as PM, see [`ClockTime::at`].

use std::fmt;

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeOfDay {
    #[default]
    AM,
    PM,
}

/// a clock reading as written in the timetable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    #[must_use]
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// Interprets the reading in the given half of the day.
    ///
    /// `12:xx AM` maps to `00:xx`, PM readings below 12 get twelve hours added.
    #[must_use]
    pub fn at(self, time_of_day: TimeOfDay) -> Option<NaiveTime> {
        let hour = match time_of_day {
            TimeOfDay::AM if self.hour == 12 => 0,
            TimeOfDay::PM if self.hour < 12 => self.hour + 12,
            _ => self.hour,
        };
        NaiveTime::from_hms_opt(u32::from(hour), u32::from(self.minute), 0)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// The juristic convention used to pick a column of the timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Convention {
    #[default]
    Hanafi,
    Jafri,
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hanafi => write!(f, "Hanafi"),
            Self::Jafri => write!(f, "Jafri"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub hanafi: ClockTime,
    pub jafri: ClockTime,
}

impl Timing {
    #[must_use]
    pub const fn get(&self, convention: Convention) -> ClockTime {
        match convention {
            Convention::Hanafi => self.hanafi,
            Convention::Jafri => self.jafri,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    /// 1 based day of Ramadan
    pub day: u8,
    pub date: &'static str,
    pub weekday: Weekday,
    pub sehri: Timing,
    pub iftar: Timing,
}

impl DayRecord {
    #[must_use]
    pub fn is_jummah(&self) -> bool {
        self.weekday == Weekday::Fri
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LocationId {
    #[default]
    Wahi,
    Hyderabad,
    Lakhra,
}

impl LocationId {
    pub const ALL: [Self; 3] = [Self::Wahi, Self::Hyderabad, Self::Lakhra];

    #[must_use]
    pub fn location(self) -> &'static Location {
        match self {
            Self::Wahi => &LOCATIONS[0],
            Self::Hyderabad => &LOCATIONS[1],
            Self::Lakhra => &LOCATIONS[2],
        }
    }

    /// short label for the location switcher
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Wahi => "🌾 Wahi",
            Self::Hyderabad => "🏙 Hyd",
            Self::Lakhra => "⛏ Lakhra",
        }
    }
}

#[derive(Debug)]
pub struct Location {
    pub id: LocationId,
    pub name: &'static str,
    pub days: &'static [DayRecord],
}

impl Location {
    /// Looks up a day of Ramadan by its 1 based index.
    #[must_use]
    pub fn day(&self, day: u8) -> Option<&'static DayRecord> {
        self.days.iter().find(|record| record.day == day)
    }

    #[must_use]
    pub fn first_day(&self) -> &'static DayRecord {
        &self.days[0]
    }
}

pub static LOCATIONS: [Location; 3] = [
    Location {
        id: LocationId::Wahi,
        name: "WAHI PANDHI",
        days: &WAHI,
    },
    Location {
        id: LocationId::Hyderabad,
        name: "HYDERABAD",
        days: &HYDERABAD,
    },
    Location {
        id: LocationId::Lakhra,
        name: "LAKHRA MINE",
        days: &LAKHRA,
    },
];

const fn row(
    day: u8,
    date: &'static str,
    weekday: Weekday,
    hanafi: [u8; 4],
    jafri: [u8; 4],
) -> DayRecord {
    DayRecord {
        day,
        date,
        weekday,
        sehri: Timing {
            hanafi: ClockTime::new(hanafi[0], hanafi[1]),
            jafri: ClockTime::new(jafri[0], jafri[1]),
        },
        iftar: Timing {
            hanafi: ClockTime::new(hanafi[2], hanafi[3]),
            jafri: ClockTime::new(jafri[2], jafri[3]),
        },
    }
}

use Weekday::{Fri, Mon, Sat, Sun, Thu, Tue, Wed};

static WAHI: [DayRecord; 30] = [
    row(1, "19 Feb", Thu, [5, 44, 6, 24], [5, 34, 6, 34]),
    row(2, "20 Feb", Fri, [5, 44, 6, 24], [5, 34, 6, 34]),
    row(3, "21 Feb", Sat, [5, 43, 6, 25], [5, 33, 6, 35]),
    row(4, "22 Feb", Sun, [5, 42, 6, 25], [5, 32, 6, 36]),
    row(5, "23 Feb", Mon, [5, 41, 6, 26], [5, 31, 6, 36]),
    row(6, "24 Feb", Tue, [5, 40, 6, 27], [5, 30, 6, 37]),
    row(7, "25 Feb", Wed, [5, 39, 6, 27], [5, 29, 6, 38]),
    row(8, "26 Feb", Thu, [5, 39, 6, 28], [5, 29, 6, 38]),
    row(9, "27 Feb", Fri, [5, 38, 6, 28], [5, 28, 6, 39]),
    row(10, "28 Feb", Sat, [5, 37, 6, 29], [5, 27, 6, 40]),
    row(11, "1 Mar", Sun, [5, 36, 6, 30], [5, 26, 6, 41]),
    row(12, "2 Mar", Mon, [5, 35, 6, 30], [5, 25, 6, 41]),
    row(13, "3 Mar", Tue, [5, 34, 6, 31], [5, 24, 6, 42]),
    row(14, "4 Mar", Wed, [5, 33, 6, 31], [5, 23, 6, 42]),
    row(15, "5 Mar", Thu, [5, 32, 6, 32], [5, 22, 6, 43]),
    row(16, "6 Mar", Fri, [5, 31, 6, 32], [5, 21, 6, 43]),
    row(17, "7 Mar", Sat, [5, 30, 6, 33], [5, 20, 6, 44]),
    row(18, "8 Mar", Sun, [5, 29, 6, 34], [5, 19, 6, 44]),
    row(19, "9 Mar", Mon, [5, 28, 6, 34], [5, 18, 6, 45]),
    row(20, "10 Mar", Tue, [5, 27, 6, 35], [5, 17, 6, 45]),
    row(21, "11 Mar", Wed, [5, 26, 6, 35], [5, 16, 6, 46]),
    row(22, "12 Mar", Thu, [5, 25, 6, 36], [5, 15, 6, 46]),
    row(23, "13 Mar", Fri, [5, 24, 6, 36], [5, 14, 6, 47]),
    row(24, "14 Mar", Sat, [5, 23, 6, 37], [5, 13, 6, 47]),
    row(25, "15 Mar", Sun, [5, 22, 6, 37], [5, 12, 6, 48]),
    row(26, "16 Mar", Mon, [5, 21, 6, 38], [5, 11, 6, 48]),
    row(27, "17 Mar", Tue, [5, 19, 6, 38], [5, 9, 6, 49]),
    row(28, "18 Mar", Wed, [5, 18, 6, 39], [5, 8, 6, 49]),
    row(29, "19 Mar", Thu, [5, 17, 6, 39], [5, 7, 6, 50]),
    row(30, "20 Mar", Fri, [5, 16, 6, 40], [5, 6, 6, 50]),
];

static HYDERABAD: [DayRecord; 30] = [
    row(1, "19 Feb", Thu, [5, 41, 6, 24], [5, 31, 6, 34]),
    row(2, "20 Feb", Fri, [5, 40, 6, 24], [5, 30, 6, 34]),
    row(3, "21 Feb", Sat, [5, 39, 6, 25], [5, 29, 6, 35]),
    row(4, "22 Feb", Sun, [5, 38, 6, 25], [5, 28, 6, 35]),
    row(5, "23 Feb", Mon, [5, 38, 6, 26], [5, 28, 6, 36]),
    row(6, "24 Feb", Tue, [5, 37, 6, 27], [5, 27, 6, 37]),
    row(7, "25 Feb", Wed, [5, 36, 6, 27], [5, 26, 6, 37]),
    row(8, "26 Feb", Thu, [5, 35, 6, 28], [5, 25, 6, 38]),
    row(9, "27 Feb", Fri, [5, 34, 6, 28], [5, 24, 6, 39]),
    row(10, "28 Feb", Sat, [5, 33, 6, 29], [5, 23, 6, 40]),
    row(11, "1 Mar", Sun, [5, 33, 6, 29], [5, 23, 6, 40]),
    row(12, "2 Mar", Mon, [5, 32, 6, 30], [5, 22, 6, 41]),
    row(13, "3 Mar", Tue, [5, 31, 6, 30], [5, 21, 6, 41]),
    row(14, "4 Mar", Wed, [5, 30, 6, 31], [5, 20, 6, 42]),
    row(15, "5 Mar", Thu, [5, 29, 6, 31], [5, 19, 6, 42]),
    row(16, "6 Mar", Fri, [5, 28, 6, 32], [5, 18, 6, 43]),
    row(17, "7 Mar", Sat, [5, 27, 6, 32], [5, 17, 6, 43]),
    row(18, "8 Mar", Sun, [5, 26, 6, 33], [5, 16, 6, 44]),
    row(19, "9 Mar", Mon, [5, 25, 6, 33], [5, 15, 6, 44]),
    row(20, "10 Mar", Tue, [5, 24, 6, 34], [5, 14, 6, 45]),
    row(21, "11 Mar", Wed, [5, 23, 6, 34], [5, 13, 6, 45]),
    row(22, "12 Mar", Thu, [5, 22, 6, 35], [5, 12, 6, 46]),
    row(23, "13 Mar", Fri, [5, 21, 6, 35], [5, 11, 6, 46]),
    row(24, "14 Mar", Sat, [5, 20, 6, 36], [5, 10, 6, 47]),
    row(25, "15 Mar", Sun, [5, 19, 6, 36], [5, 9, 6, 47]),
    row(26, "16 Mar", Mon, [5, 18, 6, 37], [5, 8, 6, 48]),
    row(27, "17 Mar", Tue, [5, 17, 6, 37], [5, 7, 6, 49]),
    row(28, "18 Mar", Wed, [5, 16, 6, 38], [5, 6, 6, 49]),
    row(29, "19 Mar", Thu, [5, 15, 6, 38], [5, 5, 6, 50]),
    row(30, "20 Mar", Fri, [5, 14, 6, 39], [5, 4, 6, 50]),
];

static LAKHRA: [DayRecord; 30] = [
    row(1, "19 Feb", Thu, [5, 43, 6, 25], [5, 33, 6, 35]),
    row(2, "20 Feb", Fri, [5, 42, 6, 25], [5, 32, 6, 36]),
    row(3, "21 Feb", Sat, [5, 41, 6, 26], [5, 31, 6, 37]),
    row(4, "22 Feb", Sun, [5, 40, 6, 26], [5, 30, 6, 37]),
    row(5, "23 Feb", Mon, [5, 39, 6, 27], [5, 29, 6, 38]),
    row(6, "24 Feb", Tue, [5, 38, 6, 27], [5, 28, 6, 39]),
    row(7, "25 Feb", Wed, [5, 37, 6, 28], [5, 27, 6, 40]),
    row(8, "26 Feb", Thu, [5, 36, 6, 28], [5, 26, 6, 40]),
    row(9, "27 Feb", Fri, [5, 35, 6, 29], [5, 25, 6, 41]),
    row(10, "28 Feb", Sat, [5, 34, 6, 29], [5, 24, 6, 42]),
    row(11, "1 Mar", Sun, [5, 33, 6, 30], [5, 23, 6, 42]),
    row(12, "2 Mar", Mon, [5, 32, 6, 30], [5, 22, 6, 43]),
    row(13, "3 Mar", Tue, [5, 31, 6, 31], [5, 21, 6, 44]),
    row(14, "4 Mar", Wed, [5, 30, 6, 31], [5, 20, 6, 44]),
    row(15, "5 Mar", Thu, [5, 29, 6, 32], [5, 19, 6, 45]),
    row(16, "6 Mar", Fri, [5, 28, 6, 32], [5, 18, 6, 46]),
    row(17, "7 Mar", Sat, [5, 27, 6, 33], [5, 17, 6, 46]),
    row(18, "8 Mar", Sun, [5, 26, 6, 34], [5, 16, 6, 47]),
    row(19, "9 Mar", Mon, [5, 25, 6, 34], [5, 15, 6, 48]),
    row(20, "10 Mar", Tue, [5, 24, 6, 35], [5, 14, 6, 48]),
    row(21, "11 Mar", Wed, [5, 23, 6, 35], [5, 13, 6, 49]),
    row(22, "12 Mar", Thu, [5, 22, 6, 36], [5, 12, 6, 50]),
    row(23, "13 Mar", Fri, [5, 21, 6, 36], [5, 11, 6, 50]),
    row(24, "14 Mar", Sat, [5, 20, 6, 37], [5, 10, 6, 51]),
    row(25, "15 Mar", Sun, [5, 19, 6, 37], [5, 9, 6, 52]),
    row(26, "16 Mar", Mon, [5, 18, 6, 38], [5, 8, 6, 52]),
    row(27, "17 Mar", Tue, [5, 17, 6, 38], [5, 7, 6, 53]),
    row(28, "18 Mar", Wed, [5, 16, 6, 39], [5, 6, 6, 54]),
    row(29, "19 Mar", Thu, [5, 15, 6, 39], [5, 5, 6, 54]),
    row(30, "20 Mar", Fri, [5, 14, 6, 40], [5, 4, 6, 55]),
];
