use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::Array;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::Dataset;
use super::normalize::{RawTable, normalize};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and clean a crash dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one record per line (the usual export)
/// * `.json`    – `[{ "Year": 1985, "Month": "July", ... }, ...]`
/// * `.parquet` – any flat schema; cells are read as text and cleaned like CSV
///
/// Every format is reduced to a [`RawTable`] first, so cleaning behaves the
/// same whatever the container. `numeric_columns` are the extra columns the
/// caller sums; see [`normalize`].
pub fn load_file(path: &Path, numeric_columns: &[String]) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (raw, ragged_rows) = match ext.as_str() {
        "csv" => read_csv(path)?,
        "json" => (read_json(path)?, 0),
        "parquet" | "pq" => (read_parquet(path)?, 0),
        other => bail!(LoadError::UnsupportedFormat(other.to_string())),
    };

    if raw.headers.is_empty() {
        bail!(LoadError::NoColumns {
            path: path.to_path_buf(),
        });
    }
    if ragged_rows > 0 {
        log::warn!(
            "{}: {ragged_rows} rows have a different field count than the header",
            path.display()
        );
    }

    let (table, mut report) = normalize(raw, numeric_columns);
    report.ragged_rows = ragged_rows;
    log::info!("Loaded {}: {report}", path.display());

    Ok(Dataset {
        table: Arc::new(table),
        source: path.to_path_buf(),
        report,
    })
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Short rows are padded with missing cells, surplus fields are dropped.
/// Returns the table and the number of rows whose length was off.
fn read_csv(path: &Path) -> Result<(RawTable, usize)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    let headers: Vec<String> = reader
        .byte_headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    let mut rows = Vec::new();
    let mut ragged = 0;

    for (row_no, result) in reader.byte_records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            ragged += 1;
        }
        let row = (0..headers.len())
            .map(|i| record.get(i).map(|b| String::from_utf8_lossy(b).into_owned()))
            .collect();
        rows.push(row);
    }

    Ok((RawTable { headers, rows }, ragged))
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`). Columns are the
/// union of all keys in first-seen order; a key missing from a record is a
/// missing cell.
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut objects = Vec::with_capacity(records.len());
    let mut headers: Vec<String> = Vec::new();
    let mut known: HashSet<String> = HashSet::new();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if known.insert(key.clone()) {
                headers.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).and_then(json_to_text))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nulls stay missing; everything else is
/// rendered with Arrow's display formatter.
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let options = FormatOptions::default();
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let formatters = batch
            .columns()
            .iter()
            .map(|col| ArrayFormatter::try_new(col.as_ref(), &options))
            .collect::<Result<Vec<_>, _>>()
            .context("preparing parquet column formatters")?;

        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .zip(&formatters)
                .map(|(col, fmt)| (!col.is_null(row)).then(|| fmt.value(row).to_string()))
                .collect();
            rows.push(cells);
        }
    }

    Ok(RawTable { headers, rows })
}
