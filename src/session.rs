use chrono::{NaiveDateTime, Timelike};
use log::debug;

use crate::{
    alerts::{reached, Alert, AlertState},
    campaign::{CampaignWindow, Status},
    config::Preferences,
    countdown::{countdown, Countdown, Targets, WakeWindow},
    timetable::{DayRecord, Location},
};

/// Everything the display needs for one moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub status: Status,
    pub countdown: Countdown,
    /// today's row, or the first day outside the month
    pub today: &'static DayRecord,
    pub wake_window: Option<WakeWindow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub view: View,
    pub alerts: Vec<Alert>,
}

/// One running clock: the user's preferences plus what has already fired.
#[derive(Debug, Clone)]
pub struct Session {
    preferences: Preferences,
    window: CampaignWindow,
    alerts: AlertState,
    previous_tick: Option<NaiveDateTime>,
}

impl Session {
    #[must_use]
    pub fn new(preferences: Preferences) -> Self {
        Self::with_window(preferences, CampaignWindow::default())
    }

    #[must_use]
    pub fn with_window(preferences: Preferences, window: CampaignWindow) -> Self {
        Self {
            preferences,
            window,
            alerts: AlertState::new(),
            previous_tick: None,
        }
    }

    #[must_use]
    pub const fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    #[must_use]
    pub fn location(&self) -> &'static Location {
        self.preferences.location.location()
    }

    #[must_use]
    pub fn view(&self, now: NaiveDateTime) -> View {
        let location = self.location();
        let status = self.window.resolve(now, location);
        let convention = self.preferences.convention;
        let wake_window = status.record().map(|record| {
            let targets = Targets::new(record, now.date(), convention);
            WakeWindow::new(targets.sehri, self.preferences.alarm_time)
        });
        View {
            countdown: countdown(&status, now, convention),
            today: status.record().unwrap_or_else(|| location.first_day()),
            status,
            wake_window,
        }
    }

    /// Computes the view and the alerts due at `now`.
    ///
    /// Alerts are evaluated at most once per wall clock second, repeated
    /// calls within the same second only refresh the view.
    pub fn tick(&mut self, now: NaiveDateTime) -> Tick {
        let view = self.view(now);
        let second = now.with_nanosecond(0).unwrap_or(now);
        if self.previous_tick == Some(second) {
            return Tick {
                view,
                alerts: Vec::new(),
            };
        }
        let previous = self.previous_tick.replace(second);
        let alerts = self.evaluate(&view, previous, second);
        if !alerts.is_empty() {
            debug!("alerts at {second}: {alerts:?}");
        }
        Tick { view, alerts }
    }

    fn evaluate(
        &mut self,
        view: &View,
        previous: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Vec<Alert> {
        let preferences = &self.preferences;
        // the countdown state advances while muted so unmuting starts fresh
        let beeps = view.countdown.target.map(|target| {
            self.alerts.evaluate(
                target,
                view.countdown.remaining,
                &preferences.beeps,
                preferences.trigger,
            )
        });
        if !preferences.sound_enabled {
            return Vec::new();
        }
        let mut alerts = beeps.unwrap_or_default();
        let wake_at = now.date().and_time(preferences.alarm_time);
        if reached(wake_at, previous, now, preferences.trigger) {
            alerts.push(Alert::WakeAlarm);
        }
        if let Some(record) = view.status.record() {
            let iftar = Targets::new(record, now.date(), preferences.convention).iftar;
            if preferences.azan_enabled && reached(iftar, previous, now, preferences.trigger) {
                alerts.push(Alert::Adhan(preferences.azan_variant));
            }
        }
        alerts
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveTime};

    use super::*;
    use crate::{
        alerts::TriggerMode,
        audio::AdhanVariant,
        countdown::Phase,
        timetable::{Convention, LocationId},
    };

    fn at(m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn ticks(session: &mut Session, from: NaiveDateTime, seconds: i64) -> Vec<Alert> {
        (0..seconds)
            .flat_map(|s| session.tick(from + Duration::seconds(s)).alerts)
            .collect()
    }

    #[test]
    fn view_before_during_after() {
        let session = Session::new(Preferences::default());
        let before = session.view(at(2, 10, 12, 0, 0));
        assert_eq!(before.status.badge(), "STARTS IN 9D");
        assert_eq!(before.countdown.phase, Phase::Waiting);
        assert_eq!(before.today.day, 1);
        assert_eq!(before.wake_window, None);

        let during = session.view(at(3, 1, 12, 0, 0));
        assert_eq!(during.status.badge(), "DAY 11");
        assert_eq!(during.today.date, "1 Mar");
        assert_eq!(during.countdown.label, "TO IFTAR");
        assert_eq!(
            during.wake_window.map(|w| w.to_string()).as_deref(),
            Some("1h 36m remaining for Sehri")
        );

        let after = session.view(at(3, 25, 12, 0, 0));
        assert_eq!(after.status, Status::After);
    }

    #[test]
    fn location_and_convention_change_the_targets() {
        let mut session = Session::new(Preferences::default());
        let now = at(2, 19, 5, 0, 0);
        assert_eq!(session.view(now).countdown.time, "00:44:00");
        session.preferences_mut().location = LocationId::Hyderabad;
        assert_eq!(session.view(now).countdown.time, "00:41:00");
        session.preferences_mut().convention = Convention::Jafri;
        assert_eq!(session.view(now).countdown.time, "00:31:00");
    }

    #[test]
    fn repeated_ticks_in_one_second_fire_once() {
        let mut session = Session::new(Preferences::default());
        let five_left = at(2, 19, 5, 43, 55);
        let first = session.tick(five_left);
        let again = session.tick(five_left + Duration::milliseconds(400));
        assert_eq!(first.alerts, vec![Alert::TripleBeep]);
        assert!(again.alerts.is_empty());
        assert_eq!(again.view.countdown.remaining, 4);
    }

    #[test]
    fn muted_session_is_silent() {
        let mut session = Session::new(Preferences {
            sound_enabled: false,
            ..Preferences::default()
        });
        assert!(ticks(&mut session, at(2, 19, 4, 43, 50), 3600).is_empty());
    }

    #[test]
    fn unmuting_does_not_replay_missed_thresholds() {
        for trigger in [TriggerMode::Exact, TriggerMode::Crossing] {
            let mut session = Session::new(Preferences {
                sound_enabled: false,
                trigger,
                ..Preferences::default()
            });
            // muted from 04:00 through both thresholds before the 05:44 sehri
            assert!(ticks(&mut session, at(2, 19, 4, 0, 0), 6180).is_empty());
            session.preferences_mut().sound_enabled = true;
            let alerts = ticks(&mut session, at(2, 19, 5, 43, 0), 45);
            assert!(alerts.is_empty(), "{trigger}: {alerts:?}");
            let last = ticks(&mut session, at(2, 19, 5, 43, 50), 10);
            assert_eq!(last, vec![Alert::TripleBeep; 10], "{trigger}");
        }
    }

    #[test]
    fn beeps_before_sehri() {
        let mut session = Session::new(Preferences::default());
        // sehri on day one is at 05:44
        let alerts = ticks(&mut session, at(2, 19, 4, 43, 55), 3610);
        let beeps: Vec<_> = alerts
            .iter()
            .filter(|a| matches!(a, Alert::Beeps(_)))
            .collect();
        assert_eq!(beeps, vec![&Alert::Beeps(1), &Alert::Beeps(2)]);
        let bursts = alerts.iter().filter(|a| **a == Alert::TripleBeep).count();
        assert_eq!(bursts, 10);
    }

    #[test]
    fn wake_alarm_and_adhan() {
        let mut session = Session::new(Preferences {
            alarm_time: NaiveTime::from_hms_opt(4, 0, 0).unwrap(),
            azan_variant: AdhanVariant::Two,
            beeps: crate::alerts::BeepConfig {
                one_hour: false,
                thirty_min: false,
                last_ten_seconds: false,
                ..Default::default()
            },
            ..Preferences::default()
        });
        assert_eq!(ticks(&mut session, at(2, 20, 3, 59, 58), 4), vec![Alert::WakeAlarm]);
        assert_eq!(
            ticks(&mut session, at(2, 20, 18, 23, 58), 4),
            vec![Alert::Adhan(AdhanVariant::Two)]
        );
    }

    #[test]
    fn adhan_needs_azan_enabled() {
        let mut session = Session::new(Preferences {
            azan_enabled: false,
            ..Preferences::default()
        });
        let alerts = ticks(&mut session, at(2, 20, 18, 23, 58), 4);
        assert!(!alerts.iter().any(|a| matches!(a, Alert::Adhan(_))));
    }

    #[test]
    fn no_adhan_outside_the_month() {
        let mut session = Session::new(Preferences::default());
        let alerts = ticks(&mut session, at(3, 22, 18, 23, 58), 4);
        assert!(alerts.is_empty());
    }

    #[test]
    fn late_tick_modes() {
        let skip = |trigger| {
            let mut session = Session::new(Preferences {
                trigger,
                ..Preferences::default()
            });
            // 05:44 sehri, so 04:44:00 is exactly one hour out
            session.tick(at(2, 19, 4, 43, 58));
            session.tick(at(2, 19, 4, 43, 59));
            session.tick(at(2, 19, 4, 44, 1)).alerts
        };
        assert!(skip(TriggerMode::Exact).is_empty());
        assert_eq!(skip(TriggerMode::Crossing), vec![Alert::Beeps(1)]);
    }
}
