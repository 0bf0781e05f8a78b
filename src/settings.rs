use chrono::{NaiveTime, Timelike};
use eframe::egui::{self, Slider, TextEdit, Widget};

use crate::{
    alerts::{Alert, BeepConfig, TriggerMode, BEEP_COUNTS},
    audio::AdhanVariant,
    config::{FontStyle, Palette, Preferences},
    player::Player,
    timetable::{ClockTime, Convention, TimeOfDay},
    widget::WidgetSize,
};

pub enum EditingState {
    Cancelled,
    Editing,
    Done(NaiveTime),
}

/// Twelve hour editor for the wake alarm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeTimeEditor {
    hour: u8,
    minute: u8,
    time_of_day: TimeOfDay,
    hour_string: String,
    minute_string: String,
}

impl From<NaiveTime> for WakeTimeEditor {
    #[allow(clippy::cast_possible_truncation)]
    fn from(time: NaiveTime) -> Self {
        let (pm, hour) = time.hour12();
        let hour = hour as u8;
        let minute = time.minute() as u8;
        Self {
            hour,
            minute,
            time_of_day: if pm { TimeOfDay::PM } else { TimeOfDay::AM },
            hour_string: hour.to_string(),
            minute_string: minute.to_string(),
        }
    }
}

impl WakeTimeEditor {
    #[must_use]
    pub fn build(&self) -> Option<NaiveTime> {
        ClockTime::new(self.hour, self.minute).at(self.time_of_day)
    }

    pub fn render(&mut self, ui: &mut egui::Ui) -> EditingState {
        let mut ret = EditingState::Editing;
        ui.horizontal(|ui| {
            self.render_hour_selector(ui);
            self.render_minute_selector(ui);
            self.render_am_pm_selector(ui);
        });
        ui.horizontal(|ui| {
            if ui.button("set").clicked() {
                if let Some(time) = self.build() {
                    ret = EditingState::Done(time);
                }
            } else if ui.button("cancel").clicked() {
                ret = EditingState::Cancelled;
            }
        });
        ret
    }

    fn render_am_pm_selector(&mut self, ui: &mut egui::Ui) {
        ui.vertical(|ui| {
            ui.add_space(15.0);
            ui.selectable_value(&mut self.time_of_day, TimeOfDay::AM, "AM");
            ui.selectable_value(&mut self.time_of_day, TimeOfDay::PM, "PM");
        });
    }

    fn render_minute_selector(&mut self, ui: &mut egui::Ui) {
        ui.vertical(|ui| {
            ui.label("Minute");
            if ui.button("Up").clicked() && self.minute < 59 {
                self.minute += 1;
                self.minute_string = self.minute.to_string();
            }
            if TextEdit::singleline(&mut self.minute_string)
                .desired_width(20.0)
                .char_limit(2)
                .ui(ui)
                .lost_focus()
            {
                if let Ok(parsed) = self.minute_string.parse::<u8>() {
                    self.minute = parsed.min(59);
                }
                // resync even when the input was garbage
                self.minute_string = self.minute.to_string();
            }
            if ui.button("Down").clicked() && self.minute > 0 {
                self.minute -= 1;
                self.minute_string = self.minute.to_string();
            }
        });
    }

    fn render_hour_selector(&mut self, ui: &mut egui::Ui) {
        ui.vertical(|ui| {
            ui.label("Hour");
            if ui.button("Up").clicked() && self.hour < 12 {
                self.hour += 1;
                self.hour_string = self.hour.to_string();
            }
            if TextEdit::singleline(&mut self.hour_string)
                .desired_width(20.0)
                .char_limit(2)
                .ui(ui)
                .lost_focus()
            {
                if let Ok(parsed) = self.hour_string.parse::<u8>() {
                    self.hour = parsed.clamp(1, 12);
                }
                self.hour_string = self.hour.to_string();
            }
            if ui.button("Down").clicked() && self.hour > 1 {
                self.hour -= 1;
                self.hour_string = self.hour.to_string();
            }
        });
    }
}

/// Contents of the settings window. Changes apply immediately.
pub struct Settings<'a> {
    pub preferences: &'a mut Preferences,
    pub player: &'a Player,
    pub wake_editor: &'a mut Option<WakeTimeEditor>,
    pub palette: &'a mut Palette,
    pub widget_mode: &'a mut bool,
    pub widget_size: &'a mut WidgetSize,
}

impl Settings<'_> {
    pub fn render(self, ui: &mut egui::Ui) {
        let Self {
            preferences,
            player,
            wake_editor,
            palette,
            widget_mode,
            widget_size,
        } = self;

        ui.heading("Azan");
        ui.checkbox(&mut preferences.azan_enabled, "play azan at Iftar");
        ui.horizontal_wrapped(|ui| {
            for variant in AdhanVariant::ALL {
                ui.selectable_value(&mut preferences.azan_variant, variant, variant.to_string());
            }
        });
        if ui.button("Test Selected Azan").clicked() {
            player.unlock();
            player.play(Alert::Adhan(preferences.azan_variant));
        }
        ui.separator();

        ui.heading("Wake alarm");
        match wake_editor {
            Some(editor) => match editor.render(ui) {
                EditingState::Done(time) => {
                    preferences.alarm_time = time;
                    *wake_editor = None;
                }
                EditingState::Cancelled => *wake_editor = None,
                EditingState::Editing => {}
            },
            None => {
                ui.horizontal(|ui| {
                    ui.label(preferences.alarm_time.format("%I:%M %p").to_string());
                    if ui.button("edit").clicked() {
                        *wake_editor = Some(WakeTimeEditor::from(preferences.alarm_time));
                    }
                });
            }
        }
        if ui.button("Test Alarm Sound").clicked() {
            player.unlock();
            player.play(Alert::WakeAlarm);
        }
        ui.separator();

        ui.heading("Timings");
        ui.horizontal(|ui| {
            for convention in [Convention::Hanafi, Convention::Jafri] {
                ui.selectable_value(
                    &mut preferences.convention,
                    convention,
                    convention.to_string(),
                );
            }
        });
        ui.separator();

        ui.heading("Countdown beeps");
        render_beep_settings(&mut preferences.beeps, ui);
        ui.label("trigger")
            .on_hover_text("crossing also catches a tick up to 5 seconds late");
        ui.horizontal(|ui| {
            for mode in [TriggerMode::Exact, TriggerMode::Crossing] {
                ui.selectable_value(&mut preferences.trigger, mode, mode.to_string());
            }
        });
        ui.separator();

        ui.heading("Widget");
        ui.checkbox(widget_mode, "widget mode");
        ui.horizontal(|ui| {
            for size in [WidgetSize::Square, WidgetSize::Wide] {
                ui.selectable_value(widget_size, size, size.to_string());
            }
        });
        ui.separator();

        ui.heading("Theme & Colors");
        render_palette(palette, ui);
    }
}

fn render_palette(palette: &mut Palette, ui: &mut egui::Ui) {
    egui::Grid::new("palette").show(ui, |ui| {
        ui.label("Primary Color");
        ui.color_edit_button_srgba(&mut palette.primary);
        ui.end_row();
        ui.label("Accent Color");
        ui.color_edit_button_srgba(&mut palette.accent);
        ui.end_row();
        ui.label("Font Style");
        ui.horizontal(|ui| {
            ui.selectable_value(&mut palette.font, FontStyle::Sans, "Sans");
            ui.selectable_value(&mut palette.font, FontStyle::Mono, "Mono");
        });
        ui.end_row();
    });
    if ui.button("reset colors").clicked() {
        *palette = Palette::default();
    }
}

fn render_beep_settings(beeps: &mut BeepConfig, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.checkbox(&mut beeps.one_hour, "1 hour before");
        ui.add_enabled(
            beeps.one_hour,
            Slider::new(&mut beeps.one_hour_count, BEEP_COUNTS).text("beeps"),
        );
    });
    ui.horizontal(|ui| {
        ui.checkbox(&mut beeps.thirty_min, "30 minutes before");
        ui.add_enabled(
            beeps.thirty_min,
            Slider::new(&mut beeps.thirty_min_count, BEEP_COUNTS).text("beeps"),
        );
    });
    ui.checkbox(&mut beeps.last_ten_seconds, "last 10 seconds");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn editor_round_trips_through_twelve_hour_form() {
        for t in [time(0, 5), time(4, 0), time(12, 0), time(18, 24), time(23, 59)] {
            assert_eq!(WakeTimeEditor::from(t).build(), Some(t));
        }
    }

    #[test]
    fn editor_fields_for_midnight_and_noon() {
        let midnight = WakeTimeEditor::from(time(0, 30));
        assert_eq!(midnight.hour, 12);
        assert_eq!(midnight.time_of_day, TimeOfDay::AM);
        let afternoon = WakeTimeEditor::from(time(15, 10));
        assert_eq!(afternoon.hour, 3);
        assert_eq!(afternoon.hour_string, "3");
        assert_eq!(afternoon.time_of_day, TimeOfDay::PM);
    }
}
