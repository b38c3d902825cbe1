use std::collections::BTreeSet;

use super::model::{DailyRecord, Dataset, Season, Weather};

// ---------------------------------------------------------------------------
// Filter predicate: date range plus allowed categorical values
// ---------------------------------------------------------------------------

/// Sidebar selection. A row passes when its date lies in the inclusive range
/// and both its season and its weather are in the allowed sets. `None` stands
/// for an unmapped code and only passes if it is itself selected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    /// Inclusive lower bound, canonical `YYYY-MM-DD`.
    pub date_from: String,
    /// Inclusive upper bound, canonical `YYYY-MM-DD`.
    pub date_to: String,
    pub seasons: BTreeSet<Option<Season>>,
    pub weathers: BTreeSet<Option<Weather>>,
}

impl FilterState {
    /// Whether a single row passes every predicate.
    pub fn matches(&self, row: &DailyRecord) -> bool {
        // Canonical dates order lexicographically, and an inverted range
        // admits nothing.
        self.date_from.as_str() <= row.date.as_str()
            && row.date.as_str() <= self.date_to.as_str()
            && self.seasons.contains(&row.season)
            && self.weathers.contains(&row.weather)
    }
}

/// Initialise a [`FilterState`] with the full date span and every distinct
/// season and weather selected (i.e., show everything).
pub fn init_filter_state(dataset: &Dataset) -> FilterState {
    let (date_from, date_to) = dataset.date_bounds.clone().unwrap_or_default();
    FilterState {
        date_from,
        date_to,
        seasons: dataset.seasons.clone(),
        weathers: dataset.weathers.clone(),
    }
}

/// Rows passing all active filters, in input order.
pub fn filter<'a, I>(rows: I, filters: &FilterState) -> Vec<&'a DailyRecord>
where
    I: IntoIterator<Item = &'a DailyRecord>,
{
    rows.into_iter().filter(|r| filters.matches(r)).collect()
}
