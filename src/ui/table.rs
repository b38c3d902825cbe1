use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::data::model::{season_label, weather_label, weekday_label, DailyRecord};
use crate::state::AppState;
use crate::ui::format::opt;

/// Columns shown in the table. `yr` and `holiday` stay in the rows but are
/// not displayed.
const HEADERS: [&str; 13] = [
    "dteday",
    "season",
    "mnth",
    "weekday",
    "workingday",
    "weathersit",
    "temp",
    "atemp",
    "hum",
    "windspeed",
    "casual",
    "registered",
    "cnt",
];

fn cells(r: &DailyRecord, state: &AppState) -> [String; 13] {
    [
        r.date.clone(),
        season_label(r.season).to_string(),
        opt(r.extra.month),
        weekday_label(r.weekday, state.locale).to_string(),
        opt(r.extra.working_day),
        weather_label(r.weather).to_string(),
        format!("{:.4}", r.temperature),
        opt(r.extra.feels_like.map(|v| format!("{v:.4}"))),
        opt(r.extra.humidity.map(|v| format!("{v:.4}"))),
        opt(r.extra.wind_speed.map(|v| format!("{v:.4}"))),
        opt(r.extra.casual),
        opt(r.extra.registered),
        r.count.to_string(),
    ]
}

/// Scrollable table of the filtered rows.
pub fn filtered_table(ui: &mut Ui, state: &AppState) {
    ui.push_id("filtered_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(true)
            .max_scroll_height(280.0)
            .columns(Column::auto().at_least(56.0), HEADERS.len())
            .header(20.0, |mut header| {
                for h in HEADERS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(h);
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, state.visible.len(), |mut row| {
                    let r = &state.visible[row.index()];
                    for cell in cells(r, state) {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Locale;
    use crate::data::model::tests::record;
    use crate::data::model::Dataset;

    #[test]
    fn test_cells_hide_indicators_and_label_codes() {
        let mut r = record("2011-01-01", 1, 2, 0, 100);
        r.year = 1;
        r.holiday = 1;
        let ds = Dataset::new(vec![r.clone()], Vec::new());
        let state = AppState::new(Arc::new(ds), Locale::Indonesian);

        let row = cells(&r, &state);
        assert_eq!(row.len(), HEADERS.len());
        assert!(!HEADERS.contains(&"yr"));
        assert!(!HEADERS.contains(&"holiday"));
        assert_eq!(row[1], "Winter");
        assert_eq!(row[3], "Senin");
        assert_eq!(row[5], "Mist");
        assert_eq!(row[12], "100");
        assert_eq!(row[2], "");
    }
}
