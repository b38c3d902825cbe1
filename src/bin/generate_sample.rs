use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate, TimeDelta};
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Day {
    date: NaiveDate,
    season: i64,
    yr: i64,
    mnth: i64,
    holiday: i64,
    weekday: i64,
    workingday: i64,
    weathersit: i64,
    temp: f64,
    atemp: f64,
    hum: f64,
    windspeed: f64,
    casual: u64,
    registered: u64,
}

impl Day {
    fn cnt(&self) -> u64 {
        self.casual + self.registered
    }
}

/// 1 Winter (Dec–Feb), 2 Spring, 3 Summer, 4 Fall.
fn season_code(month: u32) -> i64 {
    match month {
        12 | 1 | 2 => 1,
        3..=5 => 2,
        6..=8 => 3,
        _ => 4,
    }
}

/// Relative weight of each hour: commuter peaks at 8:00 and 17:00–18:00.
fn hour_weight(hour: u32) -> f64 {
    let peak = |h: f64, w: f64| (-(hour as f64 - h).powi(2) / (2.0 * w * w)).exp();
    0.05 + 0.9 * peak(8.0, 1.0) + peak(17.5, 1.5) + 0.4 * peak(13.0, 3.0)
}

fn generate_days(rng: &mut SimpleRng) -> Vec<Day> {
    let start = NaiveDate::from_ymd_opt(2011, 1, 1).expect("valid start date");
    (0..731)
        .map(|i| {
            let date = start + TimeDelta::days(i);
            let doy = date.ordinal() as f64;
            let yr = i64::from(date.year() - 2011);

            // Warmest around day 200.
            let seasonal = (2.0 * std::f64::consts::PI * (doy - 110.0) / 365.0).sin();
            let temp = (0.5 + 0.3 * seasonal + rng.gauss(0.0, 0.05)).clamp(0.05, 0.95);
            let weathersit = match rng.next_f64() {
                x if x < 0.63 => 1,
                x if x < 0.95 => 2,
                x if x < 0.995 => 3,
                _ => 4,
            };
            let weekday = i64::from(date.weekday().num_days_from_monday());
            let holiday = i64::from(rng.next_f64() < 0.03);
            let workingday = i64::from(weekday < 5 && holiday == 0);

            let weather_factor = [1.0, 0.85, 0.45, 0.2][(weathersit - 1) as usize];
            let growth = 1.0 + 0.6 * yr as f64;
            let base = (1500.0 + 5000.0 * temp) * weather_factor * growth;
            let casual_share = if workingday == 1 { 0.12 } else { 0.35 };
            let total = (base + rng.gauss(0.0, 300.0)).max(20.0);

            Day {
                date,
                season: season_code(date.month()),
                yr,
                mnth: i64::from(date.month()),
                holiday,
                weekday,
                workingday,
                weathersit,
                temp,
                atemp: (temp * 0.95 + rng.gauss(0.0, 0.02)).clamp(0.0, 1.0),
                hum: (0.6 + rng.gauss(0.0, 0.12)).clamp(0.0, 1.0),
                windspeed: (0.19 + rng.gauss(0.0, 0.07)).clamp(0.0, 1.0),
                casual: (total * casual_share) as u64,
                registered: (total * (1.0 - casual_share)) as u64,
            }
        })
        .collect()
}

fn write_day_csv(days: &[Day], path: &str) -> anyhow::Result<()> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record([
        "instant", "dteday", "season", "yr", "mnth", "holiday", "weekday", "workingday",
        "weathersit", "temp", "atemp", "hum", "windspeed", "casual", "registered", "cnt",
    ])?;
    for (i, d) in days.iter().enumerate() {
        w.write_record(&[
            (i + 1).to_string(),
            d.date.format("%Y-%m-%d").to_string(),
            d.season.to_string(),
            d.yr.to_string(),
            d.mnth.to_string(),
            d.holiday.to_string(),
            d.weekday.to_string(),
            d.workingday.to_string(),
            d.weathersit.to_string(),
            format!("{:.6}", d.temp),
            format!("{:.6}", d.atemp),
            format!("{:.6}", d.hum),
            format!("{:.6}", d.windspeed),
            d.casual.to_string(),
            d.registered.to_string(),
            d.cnt().to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Split each day's total across its 24 hours.
fn write_hour_csv(days: &[Day], path: &str, rng: &mut SimpleRng) -> anyhow::Result<usize> {
    let weights: Vec<f64> = (0..24).map(hour_weight).collect();
    let sum: f64 = weights.iter().sum();

    let mut w = csv::Writer::from_path(path)?;
    w.write_record(["instant", "dteday", "hr", "cnt"])?;
    let mut instant = 0;
    for d in days {
        for (hr, weight) in weights.iter().enumerate() {
            let share = d.cnt() as f64 * weight / sum;
            let cnt = (share * (1.0 + rng.gauss(0.0, 0.1))).max(0.0).round() as u64;
            instant += 1;
            w.write_record(&[
                instant.to_string(),
                d.date.format("%Y-%m-%d").to_string(),
                hr.to_string(),
                cnt.to_string(),
            ])?;
        }
    }
    w.flush()?;
    Ok(instant)
}

fn write_day_parquet(days: &[Day], path: &str) -> anyhow::Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("dteday", DataType::Utf8, false),
        Field::new("season", DataType::Int64, false),
        Field::new("yr", DataType::Int64, false),
        Field::new("holiday", DataType::Int64, false),
        Field::new("weekday", DataType::Int64, false),
        Field::new("weathersit", DataType::Int64, false),
        Field::new("temp", DataType::Float64, false),
        Field::new("cnt", DataType::UInt64, false),
    ]));

    let dates: Vec<String> = days.iter().map(|d| d.date.format("%Y-%m-%d").to_string()).collect();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(dates)),
            Arc::new(days.iter().map(|d| d.season).collect::<Int64Array>()),
            Arc::new(days.iter().map(|d| d.yr).collect::<Int64Array>()),
            Arc::new(days.iter().map(|d| d.holiday).collect::<Int64Array>()),
            Arc::new(days.iter().map(|d| d.weekday).collect::<Int64Array>()),
            Arc::new(days.iter().map(|d| d.weathersit).collect::<Int64Array>()),
            Arc::new(days.iter().map(|d| d.temp).collect::<Float64Array>()),
            Arc::new(days.iter().map(|d| d.cnt()).collect::<UInt64Array>()),
        ],
    )?;

    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);
    let days = generate_days(&mut rng);

    write_day_csv(&days, "day.csv")?;
    let hours = write_hour_csv(&days, "hour.csv", &mut rng)?;
    write_day_parquet(&days, "day.parquet")?;

    println!(
        "Wrote {} days to day.csv / day.parquet and {hours} hours to hour.csv",
        days.len()
    );
    Ok(())
}
