//! Decides which audible alerts a tick should fire.
//!
//! Countdown thresholds are evaluated against the whole seconds remaining to
//! the current target, wall clock alerts (wake alarm, iftar adhan) against the
//! tick's own time. Both honor a [`TriggerMode`].

use std::{fmt, ops::RangeInclusive};

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::audio::AdhanVariant;

pub const ONE_HOUR: u64 = 3600;
pub const THIRTY_MINUTES: u64 = 1800;
pub const LAST_SECONDS: u64 = 10;
/// Widest gap between two ticks that [`TriggerMode::Crossing`] bridges.
/// Anything longer (a suspended machine, a clock change) is treated like a
/// fresh start and only fires on an exact hit.
pub const MAX_CROSSING_GAP: u64 = 5;
/// how many beeps a threshold may be configured to play
pub const BEEP_COUNTS: RangeInclusive<u8> = 1..=5;

/// How a tick decides it has reached a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TriggerMode {
    /// the tick must land exactly on the threshold, a late tick misses it
    #[default]
    Exact,
    /// fires when the threshold lies between the previous and current tick,
    /// as long as they are at most [`MAX_CROSSING_GAP`] seconds apart
    Crossing,
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Crossing => write!(f, "crossing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeepConfig {
    pub one_hour: bool,
    pub one_hour_count: u8,
    pub thirty_min: bool,
    pub thirty_min_count: u8,
    pub last_ten_seconds: bool,
}

impl Default for BeepConfig {
    fn default() -> Self {
        Self {
            one_hour: true,
            one_hour_count: 1,
            thirty_min: true,
            thirty_min_count: 2,
            last_ten_seconds: true,
        }
    }
}

impl BeepConfig {
    /// Pulls both beep counts into [`BEEP_COUNTS`].
    #[must_use]
    pub fn clamped(self) -> Self {
        let clamp = |count: u8| count.clamp(*BEEP_COUNTS.start(), *BEEP_COUNTS.end());
        Self {
            one_hour_count: clamp(self.one_hour_count),
            thirty_min_count: clamp(self.thirty_min_count),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    /// `n` spaced beeps
    Beeps(u8),
    /// one burst per second in the last ten seconds
    TripleBeep,
    WakeAlarm,
    Adhan(AdhanVariant),
}

/// Per session memory of what has already fired for the current target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertState {
    target: Option<NaiveDateTime>,
    previous_remaining: Option<u64>,
    last_beep_second: Option<u64>,
}

impl AlertState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn last_beep_second(&self) -> Option<u64> {
        self.last_beep_second
    }

    /// Evaluates the countdown beeps for one tick.
    ///
    /// A change of `target` forgets everything fired for the previous one.
    /// Call it on every tick, even muted ones, and drop the result when
    /// nothing should sound: otherwise the first audible tick compares
    /// against a stale `previous_remaining`.
    pub fn evaluate(
        &mut self,
        target: NaiveDateTime,
        remaining: u64,
        config: &BeepConfig,
        mode: TriggerMode,
    ) -> Vec<Alert> {
        if self.target != Some(target) {
            *self = Self {
                target: Some(target),
                ..Self::default()
            };
        }
        let previous = self.previous_remaining;
        let hits = |threshold: u64| match (mode, previous) {
            (TriggerMode::Crossing, Some(previous))
                if previous.saturating_sub(remaining) <= MAX_CROSSING_GAP =>
            {
                previous > threshold && threshold >= remaining
            }
            _ => remaining == threshold,
        };

        let mut alerts = Vec::new();
        if config.one_hour && hits(ONE_HOUR) {
            alerts.push(Alert::Beeps(config.one_hour_count));
        }
        if config.thirty_min && hits(THIRTY_MINUTES) {
            alerts.push(Alert::Beeps(config.thirty_min_count));
        }
        if config.last_ten_seconds
            && (1..=LAST_SECONDS).contains(&remaining)
            && self.last_beep_second != Some(remaining)
        {
            alerts.push(Alert::TripleBeep);
            self.last_beep_second = Some(remaining);
        }
        self.previous_remaining = Some(remaining);
        alerts
    }
}

/// Whether the wall clock has reached `at` on this tick.
///
/// `previous` is the tick before `now`, both truncated to whole seconds.
#[must_use]
pub fn reached(
    at: NaiveDateTime,
    previous: Option<NaiveDateTime>,
    now: NaiveDateTime,
    mode: TriggerMode,
) -> bool {
    match (mode, previous) {
        (TriggerMode::Crossing, Some(previous))
            if u64::try_from((now - previous).num_seconds())
                .is_ok_and(|gap| gap <= MAX_CROSSING_GAP) =>
        {
            previous < at && at <= now
        }
        _ => now.hour() == at.hour() && now.minute() == at.minute() && now.second() == 0,
    }
}
