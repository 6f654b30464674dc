use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{LaunchDataset, LaunchRecord, OutcomeClass};

pub const COL_FLIGHT_NUMBER: &str = "Flight Number";
pub const COL_LAUNCH_SITE: &str = "Launch Site";
pub const COL_CLASS: &str = "class";
pub const COL_PAYLOAD_MASS: &str = "Payload Mass (kg)";
pub const COL_BOOSTER_VERSION: &str = "Booster Version";
pub const COL_BOOSTER_CATEGORY: &str = "Booster Version Category";

/// Columns that must be present in every input file.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    COL_FLIGHT_NUMBER,
    COL_LAUNCH_SITE,
    COL_CLASS,
    COL_PAYLOAD_MASS,
    COL_BOOSTER_CATEGORY,
];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("malformed arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// `row` counts data rows from 1, the header not included.
    #[error("row {row}: invalid value '{value}' in column '{column}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("dataset contains no launch records")]
    Empty,

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the launch table exported by pandas (primary format)
/// * `.parquet` – the same columns stored as Parquet
/// * `.json`    – `[{ "Flight Number": 1, "Launch Site": "...", ... }, ...]`
pub fn load_file(path: &Path) -> Result<LaunchDataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(open(path)?)?,
        "parquet" | "pq" => load_parquet(open(path)?)?,
        "json" => load_json(BufReader::new(open(path)?))?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    if let Some(bounds) = dataset.payload_bounds() {
        log::info!(
            "Loaded {} launches from {} sites, payload {}..{} kg",
            dataset.len(),
            dataset.sites().len(),
            bounds.min,
            bounds.max
        );
    }
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Row validation shared by all formats
// ---------------------------------------------------------------------------

/// A row as it appears in the file, before validation.
#[derive(Debug, Deserialize)]
struct RawLaunchRow {
    #[serde(rename = "Flight Number")]
    flight_number: i64,
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version", default)]
    booster_version: String,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: String,
}

impl RawLaunchRow {
    fn validate(self, row: usize) -> Result<LaunchRecord, DataLoadError> {
        let outcome_class =
            OutcomeClass::from_code(self.class).ok_or_else(|| DataLoadError::InvalidValue {
                row,
                column: COL_CLASS.to_string(),
                value: self.class.to_string(),
            })?;

        if !self.payload_mass_kg.is_finite() || self.payload_mass_kg < 0.0 {
            return Err(DataLoadError::InvalidValue {
                row,
                column: COL_PAYLOAD_MASS.to_string(),
                value: self.payload_mass_kg.to_string(),
            });
        }

        Ok(LaunchRecord {
            flight_number: self.flight_number,
            launch_site: self.launch_site,
            outcome_class,
            payload_mass_kg: self.payload_mass_kg,
            booster_version: self.booster_version,
            booster_version_category: self.booster_version_category,
        })
    }
}

fn finish(records: Vec<LaunchRecord>) -> Result<LaunchDataset, DataLoadError> {
    let dataset = LaunchDataset::from_records(records);
    if dataset.is_empty() {
        return Err(DataLoadError::Empty);
    }
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one launch per row.
/// Column order is not significant and unknown columns (such as the unnamed
/// index column pandas writes) are ignored.
pub fn load_csv<R: Read>(input: R) -> Result<LaunchDataset, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let headers = reader.headers()?.clone();

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(DataLoadError::MissingColumn(required.to_string()));
        }
    }

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let raw: RawLaunchRow = record.deserialize(Some(&headers))?;
        records.push(raw.validate(i + 1)?);
    }

    finish(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Every object must carry the required columns as keys.
pub fn load_json<R: Read>(input: R) -> Result<LaunchDataset, DataLoadError> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_reader(input)?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !row.contains_key(**c)) {
            return Err(DataLoadError::MissingColumn(missing.to_string()));
        }
        let raw: RawLaunchRow = serde_json::from_value(serde_json::Value::Object(row))?;
        records.push(raw.validate(i + 1)?);
    }
    finish(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with the same column names as the CSV.
///
/// Integer columns may be Int32 or Int64, the payload Float32 or Float64,
/// and text columns Utf8 or LargeUtf8, so files written by both **Pandas**
/// and **Polars** load.
pub fn load_parquet(file: File) -> Result<LaunchDataset, DataLoadError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;

        let flight_col = column(&batch, COL_FLIGHT_NUMBER)?;
        let site_col = column(&batch, COL_LAUNCH_SITE)?;
        let class_col = column(&batch, COL_CLASS)?;
        let payload_col = column(&batch, COL_PAYLOAD_MASS)?;
        let category_col = column(&batch, COL_BOOSTER_CATEGORY)?;
        let version_col = column(&batch, COL_BOOSTER_VERSION).ok();

        for row in 0..batch.num_rows() {
            let cell = Cell {
                row,
                row_no: records.len() + 1,
            };
            let raw = RawLaunchRow {
                flight_number: cell.read_i64(flight_col, COL_FLIGHT_NUMBER)?,
                launch_site: cell.read_string(site_col, COL_LAUNCH_SITE)?,
                class: cell.read_i64(class_col, COL_CLASS)?,
                payload_mass_kg: cell.read_f64(payload_col, COL_PAYLOAD_MASS)?,
                booster_version: match version_col {
                    Some(col) => cell.read_string(col, COL_BOOSTER_VERSION)?,
                    None => String::new(),
                },
                booster_version_category: cell
                    .read_string(category_col, COL_BOOSTER_CATEGORY)?,
            };
            records.push(raw.validate(cell.row_no)?);
        }
    }

    finish(records)
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, DataLoadError> {
    batch
        .schema()
        .index_of(name)
        .map(|i| batch.column(i))
        .map_err(|_| DataLoadError::MissingColumn(name.to_string()))
}

/// Position of one cell: `row` inside the current batch, `row_no` the
/// 1-based data row across the whole file (used in error messages).
#[derive(Clone, Copy)]
struct Cell {
    row: usize,
    row_no: usize,
}

impl Cell {
    fn unreadable(self, col: &ArrayRef, column: &str) -> DataLoadError {
        let value = if col.is_null(self.row) {
            "<null>".to_string()
        } else {
            format!("<{:?}>", col.data_type())
        };
        DataLoadError::InvalidValue {
            row: self.row_no,
            column: column.to_string(),
            value,
        }
    }

    fn read_i64(self, col: &ArrayRef, column: &str) -> Result<i64, DataLoadError> {
        if col.is_null(self.row) {
            return Err(self.unreadable(col, column));
        }
        let row = self.row;
        let value = match col.data_type() {
            DataType::Int64 => col
                .as_any()
                .downcast_ref::<Int64Array>()
                .map(|a| a.value(row)),
            DataType::Int32 => col
                .as_any()
                .downcast_ref::<Int32Array>()
                .map(|a| a.value(row) as i64),
            // pandas promotes integer columns holding NaN to float
            DataType::Float64 => col
                .as_any()
                .downcast_ref::<Float64Array>()
                .map(|a| a.value(row))
                .filter(|v| v.fract() == 0.0)
                .map(|v| v as i64),
            _ => None,
        };
        value.ok_or_else(|| self.unreadable(col, column))
    }

    fn read_f64(self, col: &ArrayRef, column: &str) -> Result<f64, DataLoadError> {
        if col.is_null(self.row) {
            return Err(self.unreadable(col, column));
        }
        let row = self.row;
        let value = match col.data_type() {
            DataType::Float64 => col
                .as_any()
                .downcast_ref::<Float64Array>()
                .map(|a| a.value(row)),
            DataType::Float32 => col
                .as_any()
                .downcast_ref::<Float32Array>()
                .map(|a| a.value(row) as f64),
            DataType::Int64 => col
                .as_any()
                .downcast_ref::<Int64Array>()
                .map(|a| a.value(row) as f64),
            DataType::Int32 => col
                .as_any()
                .downcast_ref::<Int32Array>()
                .map(|a| a.value(row) as f64),
            _ => None,
        };
        value.ok_or_else(|| self.unreadable(col, column))
    }

    fn read_string(self, col: &ArrayRef, column: &str) -> Result<String, DataLoadError> {
        if col.is_null(self.row) {
            return Err(self.unreadable(col, column));
        }
        let value = match col.data_type() {
            DataType::Utf8 | DataType::LargeUtf8 => {
                if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                    Some(s.value(self.row).to_string())
                } else {
                    // LargeStringArray
                    Some(col.as_string::<i64>().value(self.row).to_string())
                }
            }
            _ => None,
        };
        value.ok_or_else(|| self.unreadable(col, column))
    }
}
