use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{LoadError, Result};

use super::model::{DailyRecord, Passthrough, RawDailyRecord, Season, Weather, Weekday};

/// Canonical on-disk and in-memory date format.
pub const CANONICAL_DATE: &str = "%Y-%m-%d";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse any accepted date spelling, dropping a time-of-day component.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Rewrite a date into `YYYY-MM-DD`.
pub fn canonical_date(s: &str) -> Option<String> {
    parse_date(s).map(|d| d.format(CANONICAL_DATE).to_string())
}

/// Turn raw daily rows into labelled rows with canonical dates.
///
/// An unparsable date fails the whole table. Categorical codes outside their
/// domain become `None`; they are counted and reported once per column.
pub fn normalize_daily(raw: Vec<RawDailyRecord>) -> Result<Vec<DailyRecord>> {
    let mut unmapped = [0usize; 3];
    let mut out = Vec::with_capacity(raw.len());

    for (row, r) in raw.into_iter().enumerate() {
        let date = canonical_date(&r.dteday).ok_or_else(|| LoadError::InvalidDate {
            row,
            value: r.dteday.clone(),
        })?;

        let season = Season::from_code(r.season);
        let weather = Weather::from_code(r.weathersit);
        let weekday = Weekday::from_code(r.weekday);
        for (slot, missing) in unmapped
            .iter_mut()
            .zip([season.is_none(), weather.is_none(), weekday.is_none()])
        {
            *slot += usize::from(missing);
        }

        out.push(DailyRecord {
            date,
            season,
            weather,
            weekday,
            temperature: r.temp,
            count: r.cnt,
            year: r.yr,
            holiday: r.holiday,
            extra: Passthrough {
                month: r.mnth,
                working_day: r.workingday,
                feels_like: r.atemp,
                humidity: r.hum,
                wind_speed: r.windspeed,
                casual: r.casual,
                registered: r.registered,
            },
        });
    }

    for (column, n) in ["season", "weathersit", "weekday"].iter().zip(unmapped) {
        if n > 0 {
            log::warn!("{n} row(s) have an unmapped '{column}' code; shown as missing");
        }
    }

    Ok(out)
}
