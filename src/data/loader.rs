use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray, PrimitiveArray, StringArray};
use arrow::compute;
use arrow::datatypes::{
    ArrowPrimitiveType, DataType, Float64Type, Int64Type, UInt64Type, UInt8Type,
};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::de::DeserializeOwned;

use crate::error::{LoadError, Result};

use super::model::{Dataset, HourlyRecord, RawDailyRecord};
use super::normalize::normalize_daily;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and normalize both tables into a [`Dataset`].
pub fn load_dataset(daily_path: &Path, hourly_path: &Path) -> Result<Dataset> {
    let raw: Vec<RawDailyRecord> = load_file(daily_path)?;
    let daily = normalize_daily(raw)?;
    log::info!("Loaded {} daily rows from {}", daily.len(), daily_path.display());

    let hourly: Vec<HourlyRecord> = load_file(hourly_path)?;
    log::info!("Loaded {} hourly rows from {}", hourly.len(), hourly_path.display());

    Ok(Dataset::new(daily, hourly))
}

/// Load a table from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line
/// * `.json`    – `[{ "dteday": "2011-01-01", "season": 1, ... }, ...]`
/// * `.parquet` – one column per field; numeric and date columns are cast
pub fn load_file<T: DeserializeOwned + FromBatch>(path: &Path) -> Result<Vec<T>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV / JSON loaders
// ---------------------------------------------------------------------------

/// Columns are matched by header name; unknown columns are ignored and
/// optional ones may be absent.
fn load_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
    Ok(rows)
}

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    let rows = serde_json::from_reader(BufReader::new(file))?;
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Row types that can be assembled from an Arrow record batch.
pub trait FromBatch: Sized {
    /// `first_row` is the index of the batch's first row within the file.
    fn from_batch(batch: &RecordBatch, first_row: usize) -> Result<Vec<Self>>;
}

fn load_parquet<T: FromBatch>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| LoadError::io(path, e))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();
    for batch in reader {
        let batch = batch?;
        let first_row = rows.len();
        rows.extend(T::from_batch(&batch, first_row)?);
    }
    Ok(rows)
}

// -- Arrow helpers --

fn required<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
}

/// Cast a column to the primitive type `T`. Values that do not fit become null.
fn primitive<T: ArrowPrimitiveType>(col: &ArrayRef) -> Result<PrimitiveArray<T>> {
    let cast = compute::cast(col, &T::DATA_TYPE)?;
    Ok(cast.as_primitive::<T>().clone())
}

fn optional<T: ArrowPrimitiveType>(
    batch: &RecordBatch,
    name: &str,
) -> Result<Option<PrimitiveArray<T>>> {
    batch.column_by_name(name).map(primitive::<T>).transpose()
}

/// Any date-like column (Utf8, Date32, Timestamp, ...) rendered as text.
fn text(col: &ArrayRef) -> Result<StringArray> {
    let cast = compute::cast(col, &DataType::Utf8)?;
    Ok(cast.as_string::<i32>().clone())
}

fn value<T: ArrowPrimitiveType>(
    arr: &PrimitiveArray<T>,
    row: usize,
    column: &str,
    first_row: usize,
) -> Result<T::Native> {
    if arr.is_null(row) {
        return Err(LoadError::NullValue {
            row: first_row + row,
            column: column.to_string(),
        });
    }
    Ok(arr.value(row))
}

fn value_or<T: ArrowPrimitiveType>(arr: Option<&PrimitiveArray<T>>, row: usize) -> Option<T::Native> {
    arr.filter(|a| a.is_valid(row)).map(|a| a.value(row))
}

impl FromBatch for RawDailyRecord {
    fn from_batch(batch: &RecordBatch, first_row: usize) -> Result<Vec<Self>> {
        let dteday = text(required(batch, "dteday")?)?;
        let season = primitive::<Int64Type>(required(batch, "season")?)?;
        let weathersit = primitive::<Int64Type>(required(batch, "weathersit")?)?;
        let weekday = primitive::<Int64Type>(required(batch, "weekday")?)?;
        let temp = primitive::<Float64Type>(required(batch, "temp")?)?;
        let cnt = primitive::<UInt64Type>(required(batch, "cnt")?)?;

        let yr = optional::<Int64Type>(batch, "yr")?;
        let holiday = optional::<Int64Type>(batch, "holiday")?;
        let mnth = optional::<Int64Type>(batch, "mnth")?;
        let workingday = optional::<Int64Type>(batch, "workingday")?;
        let atemp = optional::<Float64Type>(batch, "atemp")?;
        let hum = optional::<Float64Type>(batch, "hum")?;
        let windspeed = optional::<Float64Type>(batch, "windspeed")?;
        let casual = optional::<UInt64Type>(batch, "casual")?;
        let registered = optional::<UInt64Type>(batch, "registered")?;

        (0..batch.num_rows())
            .map(|row| {
                if dteday.is_null(row) {
                    return Err(LoadError::NullValue {
                        row: first_row + row,
                        column: "dteday".to_string(),
                    });
                }
                Ok(RawDailyRecord {
                    dteday: dteday.value(row).to_string(),
                    season: value(&season, row, "season", first_row)?,
                    weathersit: value(&weathersit, row, "weathersit", first_row)?,
                    weekday: value(&weekday, row, "weekday", first_row)?,
                    temp: value(&temp, row, "temp", first_row)?,
                    cnt: value(&cnt, row, "cnt", first_row)?,
                    yr: value_or(yr.as_ref(), row).unwrap_or_default(),
                    holiday: value_or(holiday.as_ref(), row).unwrap_or_default(),
                    mnth: value_or(mnth.as_ref(), row),
                    workingday: value_or(workingday.as_ref(), row),
                    atemp: value_or(atemp.as_ref(), row),
                    hum: value_or(hum.as_ref(), row),
                    windspeed: value_or(windspeed.as_ref(), row),
                    casual: value_or(casual.as_ref(), row),
                    registered: value_or(registered.as_ref(), row),
                })
            })
            .collect()
    }
}

impl FromBatch for HourlyRecord {
    fn from_batch(batch: &RecordBatch, first_row: usize) -> Result<Vec<Self>> {
        let hr = primitive::<UInt8Type>(required(batch, "hr")?)?;
        let cnt = primitive::<UInt64Type>(required(batch, "cnt")?)?;

        (0..batch.num_rows())
            .map(|row| {
                Ok(HourlyRecord {
                    hour: value(&hr, row, "hr", first_row)?,
                    count: value(&cnt, row, "cnt", first_row)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Date32Array, Float64Array, Int32Array, Int64Array};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use tempfile::{Builder, NamedTempFile};

    use super::*;
    use crate::data::model::{Season, Weather};

    fn temp_with(suffix: &str, contents: &str) -> NamedTempFile {
        let mut tmp = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(tmp, "{contents}").unwrap();
        tmp
    }

    const DAY_CSV: &str = "\
instant,dteday,season,yr,mnth,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt
1,2011-01-01,1,0,1,0,6,0,2,0.344167,0.363625,0.805833,0.160446,331,654,985
2,2011-01-02,1,0,1,0,0,0,2,0.363478,0.353739,0.696087,0.248539,131,670,801
3,2011-01-03,1,0,1,0,1,1,1,0.196364,0.189405,0.437273,0.248309,120,1229,1349
";

    #[test]
    fn test_load_daily_csv() {
        let tmp = temp_with(".csv", DAY_CSV);
        let rows: Vec<RawDailyRecord> = load_file(tmp.path()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].dteday, "2011-01-01");
        assert_eq!(rows[0].weathersit, 2);
        assert_eq!(rows[2].cnt, 1349);
        assert_eq!(rows[1].casual, Some(131));
    }

    #[test]
    fn test_load_minimal_csv() {
        let tmp = temp_with(
            ".csv",
            "dteday,season,weathersit,weekday,temp,cnt\n2011-01-01,1,1,0,0.2,10\n",
        );
        let rows: Vec<RawDailyRecord> = load_file(tmp.path()).unwrap();
        assert_eq!(rows[0].yr, 0);
        assert_eq!(rows[0].mnth, None);
    }

    #[test]
    fn test_csv_missing_required_column_fails() {
        let tmp = temp_with(".csv", "dteday,season\n2011-01-01,1\n");
        let res: Result<Vec<RawDailyRecord>> = load_file(tmp.path());
        assert!(matches!(res, Err(LoadError::Csv(_))));
    }

    #[test]
    fn test_load_json_records() {
        let tmp = temp_with(
            ".json",
            r#"[{"dteday":"2011-01-01 00:00:00","season":4,"weathersit":3,"weekday":2,"temp":0.5,"cnt":42,"holiday":1}]"#,
        );
        let rows: Vec<RawDailyRecord> = load_file(tmp.path()).unwrap();
        assert_eq!(rows[0].holiday, 1);
        assert_eq!(rows[0].cnt, 42);
    }

    #[test]
    fn test_load_hourly_csv() {
        let tmp = temp_with(".csv", "instant,dteday,hr,cnt\n1,2011-01-01,0,16\n2,2011-01-01,1,40\n");
        let rows: Vec<HourlyRecord> = load_file(tmp.path()).unwrap();
        assert_eq!(rows, vec![HourlyRecord { hour: 0, count: 16 }, HourlyRecord { hour: 1, count: 40 }]);
    }

    #[test]
    fn test_unsupported_extension() {
        let tmp = temp_with(".xlsx", "");
        let res: Result<Vec<HourlyRecord>> = load_file(tmp.path());
        assert!(matches!(res, Err(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"));
    }

    #[test]
    fn test_missing_file_fails() {
        let res = load_dataset(Path::new("does/not/exist.csv"), Path::new("nor/this.csv"));
        assert!(res.is_err());
    }

    #[test]
    fn test_load_dataset_normalizes() {
        let day = temp_with(".csv", DAY_CSV);
        let hour = temp_with(".csv", "hr,cnt\n0,16\n0,20\n");
        let ds = load_dataset(day.path(), hour.path()).unwrap();
        assert_eq!(ds.daily.len(), 3);
        assert_eq!(ds.daily[0].season, Some(Season::Winter));
        assert_eq!(ds.daily[0].weather, Some(Weather::Mist));
        assert_eq!(ds.hourly.len(), 2);
        assert_eq!(
            ds.date_bounds,
            Some(("2011-01-01".to_string(), "2011-01-03".to_string()))
        );
    }

    #[test]
    fn test_load_daily_parquet() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("dteday", DataType::Date32, false),
            Field::new("season", DataType::Int32, false),
            Field::new("weathersit", DataType::Int64, false),
            Field::new("weekday", DataType::Int64, false),
            Field::new("temp", DataType::Float64, false),
            Field::new("cnt", DataType::Int64, false),
        ]));
        // 2011-01-01 is day 14975 since the Unix epoch.
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Date32Array::from(vec![14975, 14976])),
                Arc::new(Int32Array::from(vec![1, 2])),
                Arc::new(Int64Array::from(vec![1, 3])),
                Arc::new(Int64Array::from(vec![0, 1])),
                Arc::new(Float64Array::from(vec![0.2, 0.3])),
                Arc::new(Int64Array::from(vec![100, 200])),
            ],
        )
        .unwrap();

        let tmp = Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(tmp.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let rows: Vec<RawDailyRecord> = load_file(tmp.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].dteday, "2011-01-01");
        assert_eq!(rows[1].season, 2);
        assert_eq!(rows[1].cnt, 200);
        assert_eq!(rows[0].mnth, None);
    }

    #[test]
    fn test_parquet_missing_column() {
        let schema = Arc::new(Schema::new(vec![Field::new("hr", DataType::Int64, false)]));
        let batch =
            RecordBatch::try_new(schema.clone(), vec![Arc::new(Int64Array::from(vec![0, 1]))]).unwrap();

        let tmp = Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(tmp.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let res: Result<Vec<HourlyRecord>> = load_file(tmp.path());
        assert!(matches!(res, Err(LoadError::MissingColumn(c)) if c == "cnt"));
    }
}
