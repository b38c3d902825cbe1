use chrono::Datelike;

use super::aggregate::{
    average_by_weekday, average_count, distribution_by, linear_fit, total_count, BoxSummary,
    LinearFit,
};
use super::model::{DailyRecord, Season, Weather, Weekday};
use super::normalize::parse_date;

/// Everything the metrics row and the six charts draw for one filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total: u64,
    pub average: f64,
    pub by_season: Vec<(Option<Season>, BoxSummary)>,
    pub by_weather: Vec<(Option<Weather>, BoxSummary)>,
    /// `[days since CE, count]` in row order.
    pub trend: Vec<[f64; 2]>,
    pub by_weekday: Vec<(Weekday, f64)>,
    /// `[temperature, count]`.
    pub temperature: Vec<[f64; 2]>,
    pub temperature_fit: Option<LinearFit>,
    /// Unaffected by the sidebar filters.
    pub by_hour: Vec<(u8, f64)>,
}

impl DashboardSummary {
    /// Build all chart series for `rows`. Returns `None` when `rows` is empty so
    /// callers show the advisory instead of charts.
    pub fn build(rows: &[&DailyRecord], by_hour: &[(u8, f64)]) -> Option<Self> {
        let rows = rows.iter().copied();
        let average = average_count(rows.clone())?;

        let trend = rows
            .clone()
            .filter_map(|r| {
                let day = parse_date(&r.date)?.num_days_from_ce();
                Some([day as f64, r.count as f64])
            })
            .collect();

        let temperature: Vec<[f64; 2]> = rows
            .clone()
            .map(|r| [r.temperature, r.count as f64])
            .collect();
        let temperature_fit = linear_fit(&temperature);

        Some(DashboardSummary {
            total: total_count(rows.clone()),
            average,
            by_season: distribution_by(rows.clone(), |r| r.season),
            by_weather: distribution_by(rows.clone(), |r| r.weather),
            trend,
            by_weekday: average_by_weekday(rows),
            temperature,
            temperature_fit,
            by_hour: by_hour.to_vec(),
        })
    }
}
