use std::fmt;

use eframe::egui::{self, vec2, Color32, Frame, RichText, Vec2};
use serde::{Deserialize, Serialize};

use crate::{
    config::Palette,
    session::View,
    timetable::{Convention, Location},
};

/// window size of the full clock
pub const FULL_SIZE: Vec2 = vec2(720.0, 860.0);

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WidgetSize {
    #[default]
    Square,
    Wide,
}

impl WidgetSize {
    #[must_use]
    pub const fn inner_size(self) -> Vec2 {
        match self {
            Self::Square => vec2(288.0, 288.0),
            Self::Wide => vec2(340.0, 176.0),
        }
    }
}

impl fmt::Display for WidgetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Square => write!(f, "Square"),
            Self::Wide => write!(f, "Wide"),
        }
    }
}

/// What the compact clock shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetCard {
    pub label: &'static str,
    pub time: String,
    pub location: &'static str,
    pub sehri: String,
    pub iftar: String,
    pub badge: String,
}

impl WidgetCard {
    #[must_use]
    pub fn new(view: &View, location: &Location, convention: Convention) -> Self {
        Self {
            label: view.countdown.label,
            time: view.countdown.time.clone(),
            location: location.name,
            sehri: format!("{} AM", view.today.sehri.get(convention)),
            iftar: format!("{} PM", view.today.iftar.get(convention)),
            badge: view.status.badge(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetAction {
    Stay,
    OpenSettings,
    Expand,
}

pub fn render(
    ui: &mut egui::Ui,
    card: &WidgetCard,
    size: WidgetSize,
    palette: Palette,
) -> WidgetAction {
    let mut action = WidgetAction::Stay;
    ui.horizontal(|ui| {
        if ui.button("☰").on_hover_text("settings").clicked() {
            action = WidgetAction::OpenSettings;
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
            if ui.button("⛶").on_hover_text("full view").clicked() {
                action = WidgetAction::Expand;
            }
        });
    });
    let accent = |text: &str| RichText::new(text).color(palette.accent).strong();
    let time = RichText::new(&card.time).monospace().color(Color32::WHITE);
    match size {
        WidgetSize::Square => {
            ui.vertical_centered(|ui| {
                ui.label(accent(card.label));
                ui.label(time.size(44.0));
                ui.label(accent(card.location));
                ui.add_space(8.0);
                egui::Grid::new("widget_times").show(ui, |ui| {
                    ui.label(accent("Sehri"));
                    ui.label(accent("Iftar"));
                    ui.end_row();
                    ui.label(RichText::new(&card.sehri).color(Color32::WHITE));
                    ui.label(RichText::new(&card.iftar).color(Color32::WHITE));
                    ui.end_row();
                });
            });
        }
        WidgetSize::Wide => {
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(accent(card.label));
                    ui.label(time.size(32.0));
                    ui.label(accent(card.location));
                });
                ui.separator();
                egui::Grid::new("widget_times").show(ui, |ui| {
                    ui.label(accent("Sehri"));
                    ui.label(RichText::new(&card.sehri).color(Color32::WHITE));
                    ui.end_row();
                    ui.label(accent("Iftar"));
                    ui.label(RichText::new(&card.iftar).color(Color32::WHITE));
                    ui.end_row();
                    ui.label(accent(&card.badge));
                    ui.end_row();
                });
            });
        }
    }
    action
}

/// the rounded card the widget is drawn on
#[must_use]
pub fn frame(style: &egui::Style, palette: Palette) -> Frame {
    Frame::central_panel(style)
        .fill(palette.primary)
        .stroke(egui::Stroke::new(4.0, palette.accent))
        .rounding(24.0)
}
