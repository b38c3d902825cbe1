use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::color::category_color;
use crate::data::model::{season_label, weather_label};
use crate::state::AppState;
use crate::ui::format::{thousands, two_decimals};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Filters");
    ui.separator();

    if state.dataset.daily.is_empty() {
        ui.label("No daily rows loaded.");
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            date_range(ui, state);
            ui.separator();
            season_filter(ui, state);
            ui.separator();
            weather_filter(ui, state);
        });
}

fn date_range(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Date range");
    ui.label(
        RichText::new(format!("{} – {}", state.min_date, state.max_date))
            .small()
            .weak(),
    );

    let (mut from, mut to) = state.date_range();
    let mut changed = false;
    egui::Grid::new("date_range_grid").show(ui, |ui: &mut Ui| {
        ui.label("From");
        changed |= ui
            .add(DatePickerButton::new(&mut from).id_salt("date_from"))
            .changed();
        ui.end_row();
        ui.label("To");
        changed |= ui
            .add(DatePickerButton::new(&mut to).id_salt("date_to"))
            .changed();
        ui.end_row();
    });
    if changed {
        state.set_date_range(from, to);
    }
}

/// Header with select-all / select-none buttons and a selection count.
fn selection_header(ui: &mut Ui, title: &str, selected: usize, total: usize) -> Option<bool> {
    let mut action = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(format!("{title}  ({selected}/{total})"));
        if ui.small_button("All").clicked() {
            action = Some(true);
        }
        if ui.small_button("None").clicked() {
            action = Some(false);
        }
    });
    action
}

fn season_filter(ui: &mut Ui, state: &mut AppState) {
    let all = state.dataset.seasons.clone();
    if let Some(select) = selection_header(ui, "Season", state.filters.seasons.len(), all.len()) {
        state.select_all_seasons(select);
    }
    for (i, season) in all.iter().enumerate() {
        let mut checked = state.filters.seasons.contains(season);
        let text = RichText::new(season_label(*season)).color(category_color(i, all.len()));
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_season(*season);
        }
    }
}

fn weather_filter(ui: &mut Ui, state: &mut AppState) {
    let all = state.dataset.weathers.clone();
    if let Some(select) = selection_header(ui, "Weather", state.filters.weathers.len(), all.len()) {
        state.select_all_weathers(select);
    }
    for (i, weather) in all.iter().enumerate() {
        let mut checked = state.filters.weathers.contains(weather);
        let text = RichText::new(weather_label(*weather)).color(category_color(i, all.len()));
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_weather(*weather);
        }
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
        ui.menu_button("View", |ui: &mut Ui| {
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!(
            "{} days loaded, {} visible",
            state.dataset.daily.len(),
            state.visible.len()
        ));
    });

    ui.heading("🚴 Bike Sharing Data Analysis");
    ui.label("Bike usage trends by season, weather and other factors");
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Metrics row
// ---------------------------------------------------------------------------

fn metric(ui: &mut Ui, title: &str, value: &str) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(title);
            ui.label(RichText::new(value).size(26.0).strong());
        });
    });
}

/// Total and average riders for the filtered view. An empty view has no
/// average, so it shows a dash.
pub fn metrics(ui: &mut Ui, state: &AppState) {
    let (total, average) = match &state.summary {
        Some(s) => (thousands(s.total), two_decimals(s.average)),
        None => ("0".to_string(), "–".to_string()),
    };
    ui.columns(2, |cols: &mut [Ui]| {
        metric(&mut cols[0], "📊 Total riders", &total);
        metric(&mut cols[1], "📈 Average daily riders", &average);
    });
}

/// Shown instead of the charts when the filters leave nothing.
pub fn empty_advisory(ui: &mut Ui) {
    ui.group(|ui: &mut Ui| {
        ui.label(
            RichText::new(
                "⚠ No data is available for the selected filters. Please choose other options!",
            )
            .color(Color32::from_rgb(230, 160, 30)),
        );
    });
}
