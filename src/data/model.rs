use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

use crate::config::Locale;

/// Placeholder shown for a categorical code outside its mapping domain.
pub const MISSING_LABEL: &str = "<missing>";

// ---------------------------------------------------------------------------
// Categorical labels
// ---------------------------------------------------------------------------

/// Season of the year, mapped from the integer codes 1–4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// `None` for any code outside 1–4.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Season::Winter),
            2 => Some(Season::Spring),
            3 => Some(Season::Summer),
            4 => Some(Season::Fall),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

/// Weather situation, mapped from the integer codes 1–4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weather {
    Clear,
    Mist,
    LightRainSnow,
    HeavyRainSnow,
}

impl Weather {
    /// `None` for any code outside 1–4.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Weather::Clear),
            2 => Some(Weather::Mist),
            3 => Some(Weather::LightRainSnow),
            4 => Some(Weather::HeavyRainSnow),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Mist => "Mist",
            Weather::LightRainSnow => "Light Rain/Snow",
            Weather::HeavyRainSnow => "Heavy Rain/Snow",
        }
    }
}

/// Day of the week. Code 0 is Monday; the variant order is the canonical
/// display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// `None` for any code outside 0–6.
    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i))
            .copied()
    }

    /// Position in the Monday..Sunday sequence.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self, locale: Locale) -> &'static str {
        const EN: [&str; 7] = [
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ];
        const ID: [&str; 7] = ["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu"];
        match locale {
            Locale::English => EN[self.index()],
            Locale::Indonesian => ID[self.index()],
        }
    }
}

/// Label for an optional season, `<missing>` when unmapped.
pub fn season_label(season: Option<Season>) -> &'static str {
    season.map_or(MISSING_LABEL, Season::label)
}

/// Label for an optional weather situation, `<missing>` when unmapped.
pub fn weather_label(weather: Option<Weather>) -> &'static str {
    weather.map_or(MISSING_LABEL, Weather::label)
}

/// Label for an optional weekday in the given locale.
pub fn weekday_label(weekday: Option<Weekday>, locale: Locale) -> &'static str {
    weekday.map_or(MISSING_LABEL, |w| w.label(locale))
}

/// Hour-of-day label in `H:00` form.
pub fn hour_label(hour: u8) -> String {
    format!("{hour}:00")
}

// ---------------------------------------------------------------------------
// Raw rows, as read from disk
// ---------------------------------------------------------------------------

/// One daily row before normalization. Column names follow the source files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDailyRecord {
    pub dteday: String,
    pub season: i64,
    pub weathersit: i64,
    pub weekday: i64,
    pub temp: f64,
    pub cnt: u64,
    #[serde(default)]
    pub yr: i64,
    #[serde(default)]
    pub holiday: i64,
    #[serde(default)]
    pub mnth: Option<i64>,
    #[serde(default)]
    pub workingday: Option<i64>,
    #[serde(default)]
    pub atemp: Option<f64>,
    #[serde(default)]
    pub hum: Option<f64>,
    #[serde(default)]
    pub windspeed: Option<f64>,
    #[serde(default)]
    pub casual: Option<u64>,
    #[serde(default)]
    pub registered: Option<u64>,
}

// ---------------------------------------------------------------------------
// Normalized rows
// ---------------------------------------------------------------------------

/// Optional columns carried through to the table view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Passthrough {
    pub month: Option<i64>,
    pub working_day: Option<i64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub casual: Option<u64>,
    pub registered: Option<u64>,
}

/// One day of bike-share activity after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    /// Canonical `YYYY-MM-DD`; compares correctly as a string.
    pub date: String,
    pub season: Option<Season>,
    pub weather: Option<Weather>,
    pub weekday: Option<Weekday>,
    pub temperature: f64,
    pub count: u64,
    /// Year indicator, hidden from the table.
    pub year: i64,
    /// Holiday indicator, hidden from the table.
    pub holiday: i64,
    pub extra: Passthrough,
}

/// One hour of bike-share activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HourlyRecord {
    #[serde(rename = "hr")]
    pub hour: u8,
    #[serde(rename = "cnt")]
    pub count: u64,
}

// ---------------------------------------------------------------------------
// Dataset – both loaded tables
// ---------------------------------------------------------------------------

/// Both tables plus the column indices the sidebar needs. Never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub daily: Vec<DailyRecord>,
    pub hourly: Vec<HourlyRecord>,
    /// Distinct seasons present, including `None` if any code was unmapped.
    pub seasons: BTreeSet<Option<Season>>,
    /// Distinct weather situations present.
    pub weathers: BTreeSet<Option<Weather>>,
    /// Earliest and latest canonical dates, `None` for an empty daily table.
    pub date_bounds: Option<(String, String)>,
}

impl Dataset {
    /// Build column indices from the loaded tables.
    pub fn new(daily: Vec<DailyRecord>, hourly: Vec<HourlyRecord>) -> Self {
        let seasons = daily.iter().map(|r| r.season).collect();
        let weathers = daily.iter().map(|r| r.weather).collect();

        let min = daily.iter().map(|r| &r.date).min();
        let max = daily.iter().map(|r| &r.date).max();
        let date_bounds = min.zip(max).map(|(a, b)| (a.clone(), b.clone()));

        Dataset {
            daily,
            hourly,
            seasons,
            weathers,
            date_bounds,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} daily rows, {} hourly rows",
            self.daily.len(),
            self.hourly.len()
        )?;
        if let Some((lo, hi)) = &self.date_bounds {
            write!(f, " ({lo} – {hi})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Daily record with only the fields the filters and aggregates read.
    pub(crate) fn record(date: &str, season: i64, weather: i64, weekday: i64, count: u64) -> DailyRecord {
        DailyRecord {
            date: date.to_string(),
            season: Season::from_code(season),
            weather: Weather::from_code(weather),
            weekday: Weekday::from_code(weekday),
            temperature: 0.5,
            count,
            year: 0,
            holiday: 0,
            extra: Passthrough::default(),
        }
    }

    #[test]
    fn test_codes_map_to_labels() {
        let seasons: Vec<_> = (1..=4).map(|c| Season::from_code(c).unwrap().label()).collect();
        assert_eq!(seasons, ["Winter", "Spring", "Summer", "Fall"]);

        let weathers: Vec<_> = (1..=4).map(|c| Weather::from_code(c).unwrap().label()).collect();
        assert_eq!(weathers, ["Clear", "Mist", "Light Rain/Snow", "Heavy Rain/Snow"]);

        let days: Vec<_> = (0..=6)
            .map(|c| Weekday::from_code(c).unwrap().label(Locale::Indonesian))
            .collect();
        assert_eq!(days, ["Senin", "Selasa", "Rabu", "Kamis", "Jumat", "Sabtu", "Minggu"]);
        assert_eq!(Weekday::from_code(0).unwrap().label(Locale::English), "Monday");
    }

    #[test]
    fn test_out_of_domain_codes_are_missing() {
        assert_eq!(Season::from_code(0), None);
        assert_eq!(Season::from_code(5), None);
        assert_eq!(Weather::from_code(-1), None);
        assert_eq!(Weekday::from_code(7), None);
        assert_eq!(Weekday::from_code(-3), None);
        assert_eq!(season_label(None), MISSING_LABEL);
        assert_eq!(weekday_label(None, Locale::English), MISSING_LABEL);
    }

    #[test]
    fn test_hour_label() {
        assert_eq!(hour_label(0), "0:00");
        assert_eq!(hour_label(17), "17:00");
    }

    #[test]
    fn test_dataset_indices() {
        let ds = Dataset::new(
            vec![
                record("2011-01-03", 1, 1, 0, 10),
                record("2011-01-01", 1, 9, 1, 20),
                record("2011-01-02", 2, 2, 2, 30),
            ],
            Vec::new(),
        );
        assert_eq!(
            ds.date_bounds,
            Some(("2011-01-01".to_string(), "2011-01-03".to_string()))
        );
        assert_eq!(ds.seasons.len(), 2);
        assert!(ds.weathers.contains(&None));
        assert_eq!(ds.weathers.len(), 3);
    }

    #[test]
    fn test_empty_dataset_has_no_bounds() {
        let ds = Dataset::new(Vec::new(), Vec::new());
        assert!(ds.date_bounds.is_none());
        assert!(ds.seasons.is_empty());
    }
}
