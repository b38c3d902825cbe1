use chrono::NaiveDate;
use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, Points,
};

use crate::color::{category_color, gradient};
use crate::data::aggregate::BoxSummary;
use crate::data::charts::DashboardSummary;
use crate::data::model::{hour_label, season_label, weather_label, Weekday};
use crate::data::normalize::CANONICAL_DATE;
use crate::state::AppState;

const CHART_HEIGHT: f32 = 300.0;

/// Number of colour bands for the temperature scatter.
const SCATTER_BANDS: usize = 8;

// ---------------------------------------------------------------------------
// Chart section (central panel)
// ---------------------------------------------------------------------------

/// Render the six charts for the current view.
pub fn charts(ui: &mut Ui, state: &AppState, summary: &DashboardSummary) {
    section(ui, "🌤 Effect of season on bike usage");
    category_boxes(
        ui,
        "season_box",
        "Season",
        summary
            .by_season
            .iter()
            .map(|(s, b)| (season_label(*s).to_string(), *b))
            .collect(),
    );

    section(ui, "🌦 Effect of weather on bike usage");
    category_boxes(
        ui,
        "weather_box",
        "Weather",
        summary
            .by_weather
            .iter()
            .map(|(w, b)| (weather_label(*w).to_string(), *b))
            .collect(),
    );

    section(ui, "📅 Bike usage over time");
    trend(ui, &summary.trend);

    section(ui, "📆 Average riders by day of week");
    weekday_bars(ui, state, &summary.by_weekday);

    section(ui, "🌡 Temperature vs. riders");
    temperature_scatter(ui, summary);

    section(ui, "⏰ Average riders by hour of day");
    hourly_line(ui, &summary.by_hour);
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(8.0);
    ui.heading(title);
}

/// Axis labels for categorical x positions 0, 1, 2, ...
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let v = mark.value;
        if (v - v.round()).abs() > 1e-6 || v < 0.0 {
            return String::new();
        }
        labels.get(v.round() as usize).cloned().unwrap_or_default()
    }
}

/// Shared size and interaction settings. Scrolling is left to the page.
fn styled(plot: Plot) -> Plot {
    plot.height(CHART_HEIGHT)
        .allow_scroll(false)
        .allow_drag(true)
        .allow_zoom(true)
        .allow_boxed_zoom(true)
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn category_boxes(ui: &mut Ui, id: &str, x_label: &str, groups: Vec<(String, BoxSummary)>) {
    let n = groups.len();
    let labels: Vec<String> = groups.iter().map(|(l, _)| l.clone()).collect();

    styled(Plot::new(id))
        .x_axis_label(x_label)
        .y_axis_label("Riders")
        .legend(Legend::default())
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            for (i, (label, b)) in groups.iter().enumerate() {
                let color = category_color(i, n);
                let spread = BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker);
                let elem = BoxElem::new(i as f64, spread)
                    .name(format!("{label} (n={})", b.n))
                    .box_width(0.5)
                    .whisker_width(0.3)
                    .fill(color.gamma_multiply(0.4))
                    .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(label).color(color));
            }
        });
}

fn trend(ui: &mut Ui, points: &[[f64; 2]]) {
    let date_label = |x: f64| {
        NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
            .map(|d| d.format(CANONICAL_DATE).to_string())
            .unwrap_or_default()
    };

    styled(Plot::new("trend_line"))
        .x_axis_label("Date")
        .y_axis_label("Riders")
        .x_axis_formatter(move |mark, _range| date_label(mark.value))
        .label_formatter(move |_name, p| format!("{}\n{:.0} riders", date_label(p.x), p.y))
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points.to_vec()))
                    .color(Color32::LIGHT_BLUE)
                    .width(1.5),
            );
        });
}

fn weekday_bars(ui: &mut Ui, state: &AppState, averages: &[(Weekday, f64)]) {
    let labels: Vec<String> = Weekday::ALL
        .iter()
        .map(|w| w.label(state.locale).to_string())
        .collect();

    // Absent weekdays leave a gap at their fixed position.
    let bars: Vec<Bar> = averages
        .iter()
        .map(|(w, avg)| {
            Bar::new(w.index() as f64, *avg)
                .name(&labels[w.index()])
                .fill(category_color(w.index(), Weekday::ALL.len()))
                .width(0.7)
        })
        .collect();

    styled(Plot::new("weekday_bars"))
        .x_axis_label("Day")
        .y_axis_label("Average riders")
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Average riders"));
        });
}

fn temperature_scatter(ui: &mut Ui, summary: &DashboardSummary) {
    let (lo, hi) = summary
        .temperature
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p[1]), hi.max(p[1]))
        });
    let span = (hi - lo).max(1.0);

    // Colour by count, in bands.
    let mut bands: Vec<Vec<[f64; 2]>> = vec![Vec::new(); SCATTER_BANDS];
    for p in &summary.temperature {
        let t = (p[1] - lo) / span;
        let band = ((t * SCATTER_BANDS as f64) as usize).min(SCATTER_BANDS - 1);
        bands[band].push(*p);
    }

    let x_range = summary
        .temperature
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(a, b), p| {
            (a.min(p[0]), b.max(p[0]))
        });

    styled(Plot::new("temperature_scatter"))
        .x_axis_label("Temperature")
        .y_axis_label("Riders")
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for (i, pts) in bands.into_iter().enumerate() {
                if pts.is_empty() {
                    continue;
                }
                let mid = (i as f64 + 0.5) / SCATTER_BANDS as f64;
                plot_ui.points(
                    Points::new(PlotPoints::from(pts))
                        .radius(3.0)
                        .color(gradient(mid)),
                );
            }
            if let Some(fit) = summary.temperature_fit {
                let (x0, x1) = x_range;
                let line = Line::new(PlotPoints::from(vec![
                    [x0, fit.predict(x0)],
                    [x1, fit.predict(x1)],
                ]))
                .name(format!("OLS trend (R² = {:.3})", fit.r_squared))
                .color(Color32::RED)
                .width(2.0);
                plot_ui.line(line);
            }
        });
}

fn hourly_line(ui: &mut Ui, averages: &[(u8, f64)]) {
    let points: Vec<[f64; 2]> = averages.iter().map(|(h, v)| [*h as f64, *v]).collect();

    styled(Plot::new("hourly_line"))
        .x_axis_label("Hour")
        .y_axis_label("Average riders")
        .x_axis_formatter(|mark, _range| {
            let v = mark.value;
            if (v - v.round()).abs() > 1e-6 || !(0.0..24.0).contains(&v) {
                return String::new();
            }
            hour_label(v.round() as u8)
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(points))
                    .color(Color32::LIGHT_GREEN)
                    .width(2.0),
            );
        });
}
