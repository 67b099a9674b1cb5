use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{
    CellValue, Record, ACCOMMODATION, CATEGORY, COUNTRY, RATING, REQUIRED_COLUMNS, REVENUE,
    VISITORS,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load raw tourism records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one record per line (the usual export)
/// * `.json`    – `[{ "Country": "...", "Category": "...", ... }, ...]`
/// * `.parquet` – flat schema, one column per field
///
/// All six required columns are checked before any row is parsed.
pub fn load_file(path: &Path) -> Result<Vec<Record>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedFormat(other.to_string()).into()),
    };

    log::debug!("read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Column positions of the required fields within a header/schema.
struct RequiredIndices {
    country: usize,
    category: usize,
    visitors: usize,
    revenue: usize,
    rating: usize,
    accommodation: usize,
}

impl RequiredIndices {
    fn locate(headers: &[String]) -> Result<Self, DataError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            country: find(COUNTRY)?,
            category: find(CATEGORY)?,
            visitors: find(VISITORS)?,
            revenue: find(REVENUE)?,
            rating: find(RATING)?,
            accommodation: find(ACCOMMODATION)?,
        })
    }

    fn contains(&self, idx: usize) -> bool {
        [
            self.country,
            self.category,
            self.visitors,
            self.revenue,
            self.rating,
            self.accommodation,
        ]
        .contains(&idx)
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, comma delimited.
/// Columns outside the required six are kept as pass-through cells.
fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let idx = RequiredIndices::locate(&headers)?;
    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |i: usize| row.get(i).unwrap_or("");

        let mut extra = BTreeMap::new();
        for (col_idx, value) in row.iter().enumerate() {
            if idx.contains(col_idx) {
                continue;
            }
            if let Some(col_name) = headers.get(col_idx) {
                extra.insert(col_name.clone(), guess_cell_type(value));
            }
        }

        records.push(Record {
            country: cell(idx.country).to_string(),
            category: cell(idx.category).to_string(),
            visitors: parse_number(cell(idx.visitors), row_no, VISITORS)?,
            revenue: parse_number(cell(idx.revenue), row_no, REVENUE)?,
            rating: parse_number(cell(idx.rating), row_no, RATING)?,
            accommodation: guess_cell_type(cell(idx.accommodation)),
            extra,
        });
    }

    Ok(records)
}

/// Parse a numeric cell. `NaN` and infinities parse as `f64` but are rejected.
fn parse_number(s: &str, row: usize, column: &str) -> Result<f64, DataError> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DataError::InvalidNumber {
            row,
            column: column.to_string(),
            value: s.to_string(),
        })
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Country": "France",
///     "Category": "Beach",
///     "Visitors": 120000,
///     "Revenue": 5400000.0,
///     "Rating": 4.2,
///     "Accommodation_Available": "Yes"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        for name in REQUIRED_COLUMNS {
            if !obj.contains_key(name) {
                return Err(DataError::MissingColumn(name.to_string()).into());
            }
        }

        let text_field = |name: &str| match obj.get(name) {
            Some(JsonValue::String(s)) => s.clone(),
            Some(JsonValue::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        let number_field = |name: &str| -> Result<f64, DataError> {
            let value = obj.get(name);
            value
                .and_then(JsonValue::as_f64)
                .filter(|v| v.is_finite())
                .ok_or_else(|| DataError::InvalidNumber {
                    row: i,
                    column: name.to_string(),
                    value: value.map(|v| v.to_string()).unwrap_or_default(),
                })
        };

        let mut extra = BTreeMap::new();
        for (key, val) in obj {
            if REQUIRED_COLUMNS.contains(&key.as_str()) {
                continue;
            }
            extra.insert(key.clone(), json_to_cell(val));
        }

        records.push(Record {
            country: text_field(COUNTRY),
            category: text_field(CATEGORY),
            visitors: number_field(VISITORS)?,
            revenue: number_field(REVENUE)?,
            rating: number_field(RATING)?,
            accommodation: obj
                .get(ACCOMMODATION)
                .map(json_to_cell)
                .unwrap_or(CellValue::Null),
            extra,
        });
    }

    Ok(records)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the tourism table.
///
/// Expected schema:
/// - `Country`, `Category`, `Accommodation_Available`: Utf8, LargeUtf8 or a
///   dictionary of either (pandas `category` dtype)
/// - `Visitors`, `Revenue`, `Rating`: Float64, Float32, Int64 or Int32
/// - Any other columns are passed through; types other than strings, ints,
///   floats and bools are cast to strings
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let idx = RequiredIndices::locate(&headers)?;

    let reader = builder.build().context("building parquet reader")?;
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let country = text_column(batch.column(idx.country), COUNTRY)?;
        let category = text_column(batch.column(idx.category), CATEGORY)?;
        let accommodation = text_column(batch.column(idx.accommodation), ACCOMMODATION)?;

        let extra_cols: Vec<(&String, ArrayRef)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !idx.contains(*i))
            .map(|(i, name)| passthrough_column(batch.column(i), name).map(|col| (name, col)))
            .collect::<Result<_, DataError>>()?;

        for row in 0..batch.num_rows() {
            // Row numbers are global across batches.
            let row_no = records.len();

            let mut extra = BTreeMap::new();
            for (col_name, col) in &extra_cols {
                extra.insert((*col_name).clone(), extract_cell(col, row));
            }

            records.push(Record {
                country: extract_text(&country, row),
                category: extract_text(&category, row),
                visitors: extract_number(batch.column(idx.visitors), row, row_no, VISITORS)?,
                revenue: extract_number(batch.column(idx.revenue), row, row_no, REVENUE)?,
                rating: extract_number(batch.column(idx.rating), row, row_no, RATING)?,
                accommodation: extract_cell(&accommodation, row),
                extra,
            });
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn unsupported(column: &str, data_type: &DataType) -> DataError {
    DataError::UnsupportedColumnType {
        column: column.to_string(),
        data_type: format!("{data_type:?}"),
    }
}

/// Bring a text column to plain Utf8, decoding dictionaries.
fn text_column(col: &ArrayRef, name: &str) -> Result<ArrayRef, DataError> {
    match col.data_type() {
        DataType::Utf8 => Ok(Arc::clone(col)),
        DataType::LargeUtf8 => cast(col.as_ref(), &DataType::Utf8)
            .map_err(|_| unsupported(name, col.data_type())),
        DataType::Dictionary(_, values)
            if matches!(values.as_ref(), DataType::Utf8 | DataType::LargeUtf8) =>
        {
            cast(col.as_ref(), &DataType::Utf8).map_err(|_| unsupported(name, col.data_type()))
        }
        other => Err(unsupported(name, other)),
    }
}

/// Keep natively supported pass-through columns, cast everything else to Utf8.
fn passthrough_column(col: &ArrayRef, name: &str) -> Result<ArrayRef, DataError> {
    match col.data_type() {
        DataType::Utf8
        | DataType::Int32
        | DataType::Int64
        | DataType::Float32
        | DataType::Float64
        | DataType::Boolean => Ok(Arc::clone(col)),
        other => cast(col.as_ref(), &DataType::Utf8).map_err(|_| unsupported(name, other)),
    }
}

/// Read a cell of a column already normalized by [`text_column`].
fn extract_text(col: &ArrayRef, row: usize) -> String {
    match extract_cell(col, row) {
        CellValue::String(s) => s,
        _ => String::new(),
    }
}

fn extract_number(col: &ArrayRef, row: usize, row_no: usize, column: &str) -> Result<f64> {
    let cell = extract_cell(col, row);
    cell.as_f64().filter(|v| v.is_finite()).ok_or_else(|| {
        DataError::InvalidNumber {
            row: row_no,
            column: column.to_string(),
            value: match cell {
                CellValue::Null => format!("{:?}", col.data_type()),
                other => other.to_string(),
            },
        }
        .into()
    })
}

/// Extract a single cell from an Arrow column at a given row.
///
/// Only the types produced by [`text_column`] and [`passthrough_column`] are
/// expected here.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|s| CellValue::String(s.value(row).to_string()))
            .unwrap_or(CellValue::Null),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Integer(a.value(row) as i64))
            .unwrap_or(CellValue::Null),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Integer(a.value(row)))
            .unwrap_or(CellValue::Null),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Float(a.value(row) as f64))
            .unwrap_or(CellValue::Null),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Float(a.value(row)))
            .unwrap_or(CellValue::Null),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Bool(a.value(row)))
            .unwrap_or(CellValue::Null),
        _ => CellValue::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write temp file");
        file
    }

    #[test]
    fn csv_reads_required_and_extra_columns() {
        let file = write_temp(
            ".csv",
            "Location,Country,Category,Visitors,Rating,Revenue,Accommodation_Available\n\
             Nice,France,Beach,100,4.5,5000,Yes\n\
             Lyon,France,Urban,50,3.0,3000,No\n",
        );

        let records = load_file(file.path()).expect("load csv");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].country, "France");
        assert_eq!(records[0].category, "Beach");
        assert_eq!(records[0].visitors, 100.0);
        assert_eq!(records[0].revenue, 5000.0);
        assert_eq!(records[0].rating, 4.5);
        assert_eq!(records[0].accommodation, CellValue::String("Yes".into()));
        assert_eq!(
            records[1].extra.get("Location"),
            Some(&CellValue::String("Lyon".into()))
        );
    }

    #[test]
    fn csv_missing_column_is_reported_before_rows() {
        let file = write_temp(
            ".csv",
            "Country,Category,Visitors,Revenue,Accommodation_Available\n\
             France,Beach,not-a-number,5000,Yes\n",
        );

        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::MissingColumn("Rating".into()))
        );
    }

    #[test]
    fn csv_rejects_non_numeric_visitors() {
        let file = write_temp(
            ".csv",
            "Country,Category,Visitors,Revenue,Rating,Accommodation_Available\n\
             France,Beach,many,5000,4.0,Yes\n",
        );

        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::InvalidNumber { row: 0, column, .. }) if column == "Visitors"
        ));
    }

    #[test]
    fn json_records_are_loaded() {
        let file = write_temp(
            ".json",
            r#"[
                {"Country": "Japan", "Category": "Cultural", "Visitors": 10,
                 "Revenue": 250.5, "Rating": 4.9, "Accommodation_Available": "No",
                 "Location": "Kyoto"}
            ]"#,
        );

        let records = load_file(file.path()).expect("load json");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].country, "Japan");
        assert_eq!(records[0].revenue, 250.5);
        assert_eq!(records[0].accommodation, CellValue::String("No".into()));
        assert_eq!(
            records[0].extra.get("Location"),
            Some(&CellValue::String("Kyoto".into()))
        );
    }

    #[test]
    fn json_missing_column_is_reported() {
        let file = write_temp(
            ".json",
            r#"[{"Country": "Japan", "Category": "Cultural",
                 "Visitors": 10, "Revenue": 1, "Rating": 2}]"#,
        );

        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::MissingColumn("Accommodation_Available".into()))
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DataError>(),
            Some(&DataError::UnsupportedFormat("xlsx".into()))
        );
    }

    #[test]
    fn parquet_round_trip_through_arrow_writer() {
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;

        let schema = Arc::new(Schema::new(vec![
            Field::new("Country", DataType::Utf8, false),
            Field::new("Category", DataType::Utf8, false),
            Field::new("Visitors", DataType::Int64, false),
            Field::new("Revenue", DataType::Float64, false),
            Field::new("Rating", DataType::Float64, false),
            Field::new("Accommodation_Available", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["US", "US"])),
                Arc::new(StringArray::from(vec!["Beach", "Beach"])),
                Arc::new(Int64Array::from(vec![100, 50])),
                Arc::new(Float64Array::from(vec![5000.0, 3000.0])),
                Arc::new(Float64Array::from(vec![4.0, 3.5])),
                Arc::new(StringArray::from(vec!["Yes", "No"])),
            ],
        )
        .expect("record batch");
        let file = write_parquet(&batch);

        let records = load_file(file.path()).expect("load parquet");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].country, "US");
        assert_eq!(records[1].visitors, 50.0);
        assert_eq!(records[1].revenue, 3000.0);
        assert_eq!(records[1].accommodation, CellValue::String("No".into()));
    }

    fn write_parquet(batch: &arrow::record_batch::RecordBatch) -> tempfile::NamedTempFile {
        use parquet::arrow::ArrowWriter;

        let file = tempfile::Builder::new()
            .suffix(".parquet")
            .tempfile()
            .expect("temp file");
        let mut writer = ArrowWriter::try_new(file.reopen().expect("reopen"), batch.schema(), None)
            .expect("writer");
        writer.write(batch).expect("write batch");
        writer.close().expect("close writer");
        file
    }

    fn tourism_batch(country: ArrayRef) -> arrow::record_batch::RecordBatch {
        arrow::record_batch::RecordBatch::try_from_iter(vec![
            ("Country", country),
            ("Category", Arc::new(StringArray::from(vec!["Beach", "Beach"])) as ArrayRef),
            ("Visitors", Arc::new(Int64Array::from(vec![10, 20])) as ArrayRef),
            ("Revenue", Arc::new(Float64Array::from(vec![100.0, 300.0])) as ArrayRef),
            ("Rating", Arc::new(Float64Array::from(vec![4.0, 2.0])) as ArrayRef),
            (
                "Accommodation_Available",
                Arc::new(StringArray::from(vec!["Yes", "No"])) as ArrayRef,
            ),
        ])
        .expect("record batch")
    }

    #[test]
    fn csv_rejects_nan_and_infinite_numbers() {
        let nan_rating = write_temp(
            ".csv",
            "Country,Category,Visitors,Revenue,Rating,Accommodation_Available\n\
             US,Beach,10,100,NaN,Yes\n\
             US,Urban,10,200,4.0,No\n",
        );
        let err = load_file(nan_rating.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::InvalidNumber { row: 0, column, value })
                if column == "Rating" && value == "NaN"
        ));

        let inf_visitors = write_temp(
            ".csv",
            "Country,Category,Visitors,Revenue,Rating,Accommodation_Available\n\
             US,Beach,10,100,4.0,Yes\n\
             FR,Beach,inf,300,2.0,Yes\n",
        );
        let err = load_file(inf_visitors.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::InvalidNumber { row: 1, column, .. }) if column == "Visitors"
        ));
    }

    #[test]
    fn parquet_rejects_nan_rating() {
        let batch = arrow::record_batch::RecordBatch::try_from_iter(vec![
            ("Country", Arc::new(StringArray::from(vec!["US"])) as ArrayRef),
            ("Category", Arc::new(StringArray::from(vec!["Beach"])) as ArrayRef),
            ("Visitors", Arc::new(Int64Array::from(vec![10])) as ArrayRef),
            ("Revenue", Arc::new(Float64Array::from(vec![100.0])) as ArrayRef),
            ("Rating", Arc::new(Float64Array::from(vec![f64::NAN])) as ArrayRef),
            (
                "Accommodation_Available",
                Arc::new(StringArray::from(vec!["Yes"])) as ArrayRef,
            ),
        ])
        .expect("record batch");
        let file = write_parquet(&batch);

        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::InvalidNumber { row: 0, column, .. }) if column == "Rating"
        ));
    }

    #[test]
    fn parquet_decodes_dictionary_text_columns() {
        use arrow::array::DictionaryArray;
        use arrow::datatypes::Int32Type;

        let countries: DictionaryArray<Int32Type> = vec!["US", "FR"].into_iter().collect();
        let file = write_parquet(&tourism_batch(Arc::new(countries)));

        let records = load_file(file.path()).expect("load parquet");
        assert_eq!(records[0].country, "US");
        assert_eq!(records[1].country, "FR");
    }

    #[test]
    fn parquet_rejects_non_text_country() {
        let file = write_parquet(&tourism_batch(Arc::new(Int64Array::from(vec![1, 2]))));

        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::UnsupportedColumnType { column, .. }) if column == "Country"
        ));
    }
}
