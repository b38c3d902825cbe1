use std::collections::BTreeMap;

use super::model::{DailyRecord, HourlyRecord, Weekday};

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// Sum of `count`; 0 for no rows.
pub fn total_count<'a>(rows: impl IntoIterator<Item = &'a DailyRecord>) -> u64 {
    rows.into_iter().map(|r| r.count).sum()
}

/// Mean of `count`; `None` for no rows.
pub fn average_count<'a>(rows: impl IntoIterator<Item = &'a DailyRecord>) -> Option<f64> {
    mean(rows.into_iter().map(|r| r.count as f64))
}

fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// Grouped means
// ---------------------------------------------------------------------------

/// Accumulates (sum, n) per key; a `BTreeMap` keeps keys in natural order.
fn grouped_mean<K: Ord>(pairs: impl IntoIterator<Item = (K, f64)>) -> Vec<(K, f64)> {
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for (key, v) in pairs {
        let slot = groups.entry(key).or_insert((0.0, 0));
        slot.0 += v;
        slot.1 += 1;
    }
    groups
        .into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

/// Mean daily count per weekday, Monday first. Weekdays with no rows, and rows
/// whose weekday code was unmapped, produce no entry.
pub fn average_by_weekday<'a>(
    rows: impl IntoIterator<Item = &'a DailyRecord>,
) -> Vec<(Weekday, f64)> {
    grouped_mean(
        rows.into_iter()
            .filter_map(|r| r.weekday.map(|w| (w, r.count as f64))),
    )
}

/// Mean count per hour of day over the whole hourly table, hour 0 first.
pub fn average_by_hour(hourly: &[HourlyRecord]) -> Vec<(u8, f64)> {
    grouped_mean(hourly.iter().map(|r| (r.hour, r.count as f64)))
}

// ---------------------------------------------------------------------------
// Box-plot statistics
// ---------------------------------------------------------------------------

/// Five-number summary with Tukey whiskers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub n: usize,
}

/// Quantile of sorted data by linear interpolation between closest ranks.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Summarise a sample for a box plot. Whiskers reach the most extreme values
/// within 1.5 × IQR of the quartiles. `None` for an empty sample.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let fence = 1.5 * (q3 - q1);

    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|&v| v >= q1 - fence)
        .unwrap_or(q1);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= q3 + fence)
        .unwrap_or(q3);

    Some(BoxSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        n: sorted.len(),
    })
}

/// Box summary of daily count per group, groups in order of first appearance.
pub fn distribution_by<'a, K, F>(
    rows: impl IntoIterator<Item = &'a DailyRecord>,
    key: F,
) -> Vec<(K, BoxSummary)>
where
    K: PartialEq,
    F: Fn(&DailyRecord) -> K,
{
    let mut groups: Vec<(K, Vec<f64>)> = Vec::new();
    for r in rows {
        let k = key(r);
        let v = r.count as f64;
        match groups.iter_mut().find(|(g, _)| *g == k) {
            Some((_, values)) => values.push(v),
            None => groups.push((k, vec![v])),
        }
    }
    groups
        .into_iter()
        .filter_map(|(k, values)| box_summary(&values).map(|s| (k, s)))
        .collect()
}

// ---------------------------------------------------------------------------
// Trend line
// ---------------------------------------------------------------------------

/// Ordinary least squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// `None` with fewer than two points or when every x is identical.
pub fn linear_fit(points: &[[f64; 2]]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p[0]).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p[1]).sum::<f64>() / n;

    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for [x, y] in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx.abs() < f64::EPSILON {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if syy.abs() < f64::EPSILON {
        1.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };
    Some(LinearFit {
        slope,
        intercept,
        r_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::Season;

    #[test]
    fn test_total_and_average() {
        let rows = vec![
            record("2021-01-01", 1, 1, 0, 10),
            record("2021-01-02", 1, 1, 1, 20),
            record("2021-01-03", 1, 1, 2, 30),
        ];
        assert_eq!(total_count(&rows), 60);
        assert_eq!(average_count(&rows), Some(20.0));
    }

    #[test]
    fn test_empty_scalars() {
        let rows: Vec<DailyRecord> = Vec::new();
        assert_eq!(total_count(&rows), 0);
        assert_eq!(average_count(&rows), None);
    }

    #[test]
    fn test_weekday_average_is_monday_first_with_gaps() {
        // Input deliberately out of order and missing Wednesday/Thursday.
        let rows = vec![
            record("2021-01-03", 1, 1, 6, 70),
            record("2021-01-04", 1, 1, 0, 10),
            record("2021-01-08", 1, 1, 4, 50),
            record("2021-01-11", 1, 1, 0, 30),
            record("2021-01-05", 1, 1, 1, 20),
            record("2021-01-09", 1, 1, 5, 60),
            record("2021-01-10", 1, 1, 9, 999),
        ];
        let avg = average_by_weekday(&rows);
        assert_eq!(
            avg,
            vec![
                (Weekday::Monday, 20.0),
                (Weekday::Tuesday, 20.0),
                (Weekday::Friday, 50.0),
                (Weekday::Saturday, 60.0),
                (Weekday::Sunday, 70.0),
            ]
        );
    }

    #[test]
    fn test_hour_average_is_numeric_order() {
        let hourly = vec![
            HourlyRecord { hour: 10, count: 5 },
            HourlyRecord { hour: 2, count: 4 },
            HourlyRecord { hour: 10, count: 15 },
            HourlyRecord { hour: 0, count: 1 },
            HourlyRecord { hour: 23, count: 8 },
        ];
        let avg = average_by_hour(&hourly);
        let hours: Vec<u8> = avg.iter().map(|(h, _)| *h).collect();
        assert_eq!(hours, [0, 2, 10, 23]);
        assert_eq!(avg[2].1, 10.0);
    }

    #[test]
    fn test_hour_average_full_day() {
        let hourly: Vec<_> = (0..48u64)
            .map(|i| HourlyRecord {
                hour: (i % 24) as u8,
                count: i,
            })
            .collect();
        let avg = average_by_hour(&hourly);
        assert_eq!(avg.len(), 24);
        assert_eq!(avg[0], (0, 12.0));
        assert_eq!(avg[23], (23, 35.0));
    }

    #[test]
    fn test_box_summary_quartiles() {
        let s = box_summary(&[7.0, 1.0, 3.0, 5.0, 9.0]).unwrap();
        assert_eq!(s.median, 5.0);
        assert_eq!(s.q1, 3.0);
        assert_eq!(s.q3, 7.0);
        assert_eq!(s.lower_whisker, 1.0);
        assert_eq!(s.upper_whisker, 9.0);
        assert_eq!(s.n, 5);
    }

    #[test]
    fn test_box_summary_interpolates_and_clips_outliers() {
        let s = box_summary(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(s.q1, 2.0);
        assert_eq!(s.q3, 4.0);
        assert_eq!(s.upper_whisker, 4.0);

        let even = box_summary(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(even.median, 2.5);
        assert_eq!(even.q1, 1.75);

        assert!(box_summary(&[]).is_none());
    }

    #[test]
    fn test_distribution_keeps_first_appearance_order() {
        let rows = vec![
            record("2021-06-01", 3, 1, 0, 30),
            record("2021-01-01", 1, 1, 0, 10),
            record("2021-06-02", 3, 1, 0, 50),
        ];
        let dist = distribution_by(&rows, |r| r.season);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].0, Some(Season::Summer));
        assert_eq!(dist[0].1.median, 40.0);
        assert_eq!(dist[1].0, Some(Season::Winter));
    }

    #[test]
    fn test_linear_fit() {
        let fit = linear_fit(&[[0.0, 1.0], [1.0, 3.0], [2.0, 5.0]]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert!((fit.predict(3.0) - 7.0).abs() < 1e-12);

        assert!(linear_fit(&[[1.0, 1.0]]).is_none());
        assert!(linear_fit(&[[1.0, 1.0], [1.0, 2.0]]).is_none());
    }
}
