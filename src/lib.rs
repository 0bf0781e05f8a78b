#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![deny(clippy::use_self, rust_2018_idioms)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

use std::time::Duration;

use chrono::Local;
use config::{Config, Palette, Theme};
use countdown::Phase;
use eframe::egui::{
    self, Button, CentralPanel, Color32, FontFamily, Frame, Grid, Layout, RichText, ScrollArea,
    TextStyle, TopBottomPanel, Vec2, ViewportCommand, Window,
};
use player::Player;
use session::{Session, View};
use settings::{Settings, WakeTimeEditor};
use timetable::{DayRecord, LocationId};
use widget::{WidgetAction, WidgetCard, WidgetSize, FULL_SIZE};

pub mod alerts;
pub mod audio;
pub mod campaign;
pub mod communication;
pub mod config;
pub mod countdown;
pub mod error;
pub mod player;
pub mod session;
/// settings window and wake time editor for egui
pub mod settings;
pub mod speaker;
pub mod timetable;
pub mod tone;
/// compact always-visible view of the countdown
pub mod widget;

const EMERALD: Color32 = Color32::from_rgb(16, 185, 129);

pub struct RamadanClock {
    theme: Theme,
    palette: Palette,
    time_format: String,
    session: Session,
    player: Player,
    in_settings: bool,
    wake_editor: Option<WakeTimeEditor>,
    widget_mode: bool,
    widget_size: WidgetSize,
    /// last size requested from the window, starts at the native options size
    window_size: Vec2,
}

impl RamadanClock {
    #[must_use]
    pub fn new(config: Config, player: Player) -> Self {
        Self {
            theme: config.theme,
            palette: config.palette,
            time_format: config.time_format,
            session: Session::new(config.preferences),
            player,
            in_settings: false,
            wake_editor: None,
            widget_mode: false,
            widget_size: config.widget_size,
            window_size: FULL_SIZE,
        }
    }

    fn apply_style(&self, ctx: &egui::Context) {
        let mut visuals: egui::Visuals = self.theme.into();
        visuals.selection.bg_fill = self.palette.accent;
        visuals.hyperlink_color = self.palette.accent;
        ctx.set_visuals(visuals);
        let family = FontFamily::from(self.palette.font);
        ctx.style_mut(|style| {
            for text_style in [
                TextStyle::Small,
                TextStyle::Body,
                TextStyle::Button,
                TextStyle::Heading,
            ] {
                if let Some(font) = style.text_styles.get_mut(&text_style) {
                    font.family = family.clone();
                }
            }
        });
    }

    /// resizes the window when switching between the widget and the full clock
    fn fit_window(&mut self, ctx: &egui::Context) {
        let wanted = if self.widget_mode {
            self.widget_size.inner_size()
        } else {
            FULL_SIZE
        };
        if wanted != self.window_size {
            ctx.send_viewport_cmd(ViewportCommand::InnerSize(wanted));
            self.window_size = wanted;
        }
    }

    /// advances the session to the current time and sends whatever is due
    fn tick(&mut self) -> View {
        let tick = self.session.tick(Local::now().naive_local());
        for alert in tick.alerts {
            self.player.play(alert);
        }
        tick.view
    }

    fn render_settings(&mut self, ctx: &egui::Context) {
        Window::new("settings ⚙")
            .open(&mut self.in_settings)
            .show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    Settings {
                        preferences: self.session.preferences_mut(),
                        player: &self.player,
                        wake_editor: &mut self.wake_editor,
                        palette: &mut self.palette,
                        widget_mode: &mut self.widget_mode,
                        widget_size: &mut self.widget_size,
                    }
                    .render(ui);
                });
            });
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("time_and_ctrl").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let theme_btn = ui.add(Button::new({
                    if self.theme == Theme::Dark {
                        "🌞"
                    } else {
                        "🌙"
                    }
                }));
                if theme_btn.clicked() {
                    self.theme = !self.theme;
                }
                ui.label(Local::now().format(&self.time_format).to_string());
                ui.with_layout(Layout::right_to_left(eframe::emath::Align::Min), |ui| {
                    if ui.button("⚙").on_hover_text("settings").clicked() {
                        self.in_settings = true;
                        self.player.unlock();
                    }
                    if ui.button("▣").on_hover_text("widget mode").clicked() {
                        self.widget_mode = true;
                    }
                    self.render_sound_toggle(ui);
                    self.render_location_selector(ui);
                });
            });
        });
    }

    fn render_sound_toggle(&mut self, ui: &mut egui::Ui) {
        let preferences = self.session.preferences_mut();
        let (icon, hint) = if preferences.sound_enabled {
            ("🔊", "mute alerts")
        } else {
            ("🔇", "enable alerts")
        };
        if ui.button(icon).on_hover_text(hint).clicked() {
            preferences.sound_enabled = !preferences.sound_enabled;
            if preferences.sound_enabled {
                // first interaction, get the output device ready
                self.player.unlock();
            } else {
                self.player.stop();
            }
        }
    }

    fn render_location_selector(&mut self, ui: &mut egui::Ui) {
        let location = &mut self.session.preferences_mut().location;
        for id in LocationId::ALL.into_iter().rev() {
            ui.selectable_value(location, id, id.short_name());
        }
    }

    fn render_countdown(&self, ui: &mut egui::Ui, view: &View) {
        let accent = self.palette.accent;
        let time_color = match view.countdown.phase {
            Phase::Iftar => EMERALD,
            Phase::Waiting | Phase::Sehri | Phase::Fasting => Color32::WHITE,
        };
        Frame::group(ui.style())
            .fill(self.palette.primary)
            .stroke(egui::Stroke::new(2.0, accent))
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new(self.session.location().name)
                            .heading()
                            .color(accent),
                    );
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(view.status.badge()).strong().color(accent));
                        let (state, state_color) = if view.status.is_active() {
                            ("ACTIVE", EMERALD)
                        } else {
                            ("WAITING", Color32::GRAY)
                        };
                        ui.label(RichText::new(state).color(state_color));
                    });
                    ui.label(RichText::new(view.countdown.label).color(accent));
                    ui.label(
                        RichText::new(&view.countdown.time)
                            .size(56.0)
                            .monospace()
                            .color(time_color),
                    );
                    ui.label(
                        RichText::new(&view.countdown.message).color(Color32::from_gray(220)),
                    );
                });
            });
    }

    fn render_widget(&mut self, ctx: &egui::Context, view: &View) {
        let card = WidgetCard::new(
            view,
            self.session.location(),
            self.session.preferences().convention,
        );
        let frame = widget::frame(&ctx.style(), self.palette);
        CentralPanel::default().frame(frame).show(ctx, |ui| {
            match widget::render(ui, &card, self.widget_size, self.palette) {
                WidgetAction::OpenSettings => {
                    self.in_settings = true;
                    self.player.unlock();
                }
                WidgetAction::Expand => self.widget_mode = false,
                WidgetAction::Stay => {}
            }
        });
    }

    fn render_today(&self, ui: &mut egui::Ui, view: &View) {
        let convention = self.session.preferences().convention;
        Grid::new("today").num_columns(2).show(ui, |ui| {
            ui.label("Sehri");
            ui.label(format!("{} AM", view.today.sehri.get(convention)));
            ui.end_row();
            ui.label("Iftar");
            ui.label(format!("{} PM", view.today.iftar.get(convention)));
            ui.end_row();
            ui.label("Wake alarm");
            ui.label(
                self.session
                    .preferences()
                    .alarm_time
                    .format("%I:%M %p")
                    .to_string(),
            );
            ui.end_row();
        });
        if let Some(wake_window) = view.wake_window {
            ui.label(wake_window.to_string());
        }
    }

    fn render_timetable(&self, ui: &mut egui::Ui, view: &View) {
        let today = view.status.record().map(|record| record.day);
        Grid::new("timetable")
            .striped(true)
            .num_columns(7)
            .show(ui, |ui| {
                for heading in [
                    "Day",
                    "Date",
                    "",
                    "Sehri (Hanafi)",
                    "Iftar (Hanafi)",
                    "Sehri (Jafri)",
                    "Iftar (Jafri)",
                ] {
                    ui.label(RichText::new(heading).strong());
                }
                ui.end_row();
                for record in self.session.location().days {
                    render_row(ui, record, today == Some(record.day), self.palette.accent);
                }
            });
    }
}

fn render_row(ui: &mut egui::Ui, record: &DayRecord, is_today: bool, highlight: Color32) {
    let cell = |text: String| {
        let text = RichText::new(text);
        if is_today {
            text.strong().color(highlight)
        } else {
            text
        }
    };
    ui.label(cell(record.day.to_string()));
    ui.label(cell(format!("{} {}", record.weekday, record.date)));
    if record.is_jummah() {
        ui.label(cell("J".to_string())).on_hover_text("Jummah");
    } else {
        ui.label("");
    }
    ui.label(cell(format!("{} AM", record.sehri.hanafi)));
    ui.label(cell(format!("{} PM", record.iftar.hanafi)));
    ui.label(cell(format!("{} AM", record.sehri.jafri)));
    ui.label(cell(format!("{} PM", record.iftar.jafri)));
    ui.end_row();
}

impl eframe::App for RamadanClock {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let view = self.tick();
        self.apply_style(ctx);
        if self.in_settings {
            self.render_settings(ctx);
        }
        if self.widget_mode {
            self.render_widget(ctx, &view);
        } else {
            self.render_header(ctx);
            CentralPanel::default().show(ctx, |ui| {
                ScrollArea::vertical().show(ui, |ui| {
                    self.render_countdown(ui, &view);
                    ui.separator();
                    self.render_today(ui, &view);
                    ui.separator();
                    self.render_timetable(ui, &view);
                });
            });
        }
        self.fit_window(ctx);
        // alerts are driven by repaints, keep them coming while idle
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}
