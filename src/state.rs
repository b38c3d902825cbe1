use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::Locale;
use crate::data::aggregate::average_by_hour;
use crate::data::charts::DashboardSummary;
use crate::data::filter::{filter, init_filter_state, FilterState};
use crate::data::model::{DailyRecord, Dataset, Season, Weather};
use crate::data::normalize::{parse_date, CANONICAL_DATE};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded tables, shared read-only.
    pub dataset: Arc<Dataset>,

    /// Weekday label language.
    pub locale: Locale,

    /// Date range, season and weather selections.
    pub filters: FilterState,

    /// Bounds for the date pickers.
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,

    /// Rows passing the current filters.
    pub visible: Vec<DailyRecord>,

    /// Metrics and chart series for `visible`; `None` when it is empty.
    pub summary: Option<DashboardSummary>,

    /// Hourly profile of the full hourly table, independent of the filters.
    by_hour: Vec<(u8, f64)>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, locale: Locale) -> Self {
        let filters = init_filter_state(&dataset);
        let (min_date, max_date) = dataset
            .date_bounds
            .as_ref()
            .and_then(|(lo, hi)| parse_date(lo).zip(parse_date(hi)))
            .unwrap_or_default();
        let by_hour = average_by_hour(&dataset.hourly);

        let mut state = Self {
            dataset,
            locale,
            filters,
            min_date,
            max_date,
            visible: Vec::new(),
            summary: None,
            by_hour,
        };
        state.refilter();
        state
    }

    /// Recompute the filtered view and everything derived from it.
    pub fn refilter(&mut self) {
        let rows = filter(&self.dataset.daily, &self.filters);
        self.summary = DashboardSummary::build(&rows, &self.by_hour);
        self.visible = rows.into_iter().cloned().collect();
        log::debug!(
            "refilter: {} of {} rows visible",
            self.visible.len(),
            self.dataset.daily.len()
        );
    }

    /// Current range as picker dates.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        let from = parse_date(&self.filters.date_from).unwrap_or(self.min_date);
        let to = parse_date(&self.filters.date_to).unwrap_or(self.max_date);
        (from, to)
    }

    /// Set the range from the pickers, clamped to the dataset's bounds. The
    /// order is kept as given; an inverted range simply matches nothing.
    pub fn set_date_range(&mut self, from: NaiveDate, to: NaiveDate) {
        let clamp = |d: NaiveDate| d.clamp(self.min_date, self.max_date);
        self.filters.date_from = clamp(from).format(CANONICAL_DATE).to_string();
        self.filters.date_to = clamp(to).format(CANONICAL_DATE).to_string();
        self.refilter();
    }

    pub fn toggle_season(&mut self, season: Option<Season>) {
        if !self.filters.seasons.remove(&season) {
            self.filters.seasons.insert(season);
        }
        self.refilter();
    }

    pub fn toggle_weather(&mut self, weather: Option<Weather>) {
        if !self.filters.weathers.remove(&weather) {
            self.filters.weathers.insert(weather);
        }
        self.refilter();
    }

    /// Select every season (`true`) or none (`false`).
    pub fn select_all_seasons(&mut self, all: bool) {
        self.filters.seasons = if all {
            self.dataset.seasons.clone()
        } else {
            Default::default()
        };
        self.refilter();
    }

    /// Select every weather situation (`true`) or none (`false`).
    pub fn select_all_weathers(&mut self, all: bool) {
        self.filters.weathers = if all {
            self.dataset.weathers.clone()
        } else {
            Default::default()
        };
        self.refilter();
    }

    /// Back to the startup selection.
    pub fn reset_filters(&mut self) {
        self.filters = init_filter_state(&self.dataset);
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::HourlyRecord;

    fn state() -> AppState {
        let ds = Dataset::new(
            vec![
                record("2021-01-01", 1, 1, 0, 10),
                record("2021-01-02", 1, 2, 1, 20),
                record("2021-01-03", 2, 1, 2, 30),
                record("2021-01-04", 2, 3, 3, 40),
                record("2021-01-05", 3, 1, 4, 50),
            ],
            vec![
                HourlyRecord { hour: 1, count: 4 },
                HourlyRecord { hour: 0, count: 2 },
            ],
        );
        AppState::new(Arc::new(ds), Locale::English)
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_starts_unfiltered() {
        let s = state();
        assert_eq!(s.visible.len(), 5);
        assert_eq!(s.summary.as_ref().unwrap().total, 150);
        assert_eq!(s.date_range(), (ymd(2021, 1, 1), ymd(2021, 1, 5)));
    }

    #[test]
    fn test_date_range_is_clamped() {
        let mut s = state();
        s.set_date_range(ymd(2020, 6, 1), ymd(2021, 1, 2));
        assert_eq!(s.filters.date_from, "2021-01-01");
        assert_eq!(s.visible.len(), 2);

        s.set_date_range(ymd(2021, 1, 4), ymd(2030, 1, 1));
        assert_eq!(s.filters.date_to, "2021-01-05");
        assert_eq!(s.visible.len(), 2);
    }

    #[test]
    fn test_inverted_range_goes_empty() {
        let mut s = state();
        s.set_date_range(ymd(2021, 1, 4), ymd(2021, 1, 2));
        assert!(s.visible.is_empty());
        assert!(s.summary.is_none());
    }

    #[test]
    fn test_toggles_and_reset() {
        let mut s = state();
        s.toggle_season(Some(Season::Winter));
        assert_eq!(s.visible.len(), 3);
        s.toggle_season(Some(Season::Winter));
        assert_eq!(s.visible.len(), 5);

        s.select_all_weathers(false);
        assert!(s.summary.is_none());
        s.toggle_weather(Some(Weather::Mist));
        assert_eq!(s.visible.len(), 1);

        s.reset_filters();
        assert_eq!(s.visible.len(), 5);
    }

    #[test]
    fn test_hourly_profile_ignores_filters() {
        let mut s = state();
        s.select_all_seasons(false);
        s.toggle_season(Some(Season::Summer));
        let summary = s.summary.as_ref().unwrap();
        assert_eq!(summary.total, 50);
        assert_eq!(summary.by_hour, vec![(0, 2.0), (1, 4.0)]);
    }
}
