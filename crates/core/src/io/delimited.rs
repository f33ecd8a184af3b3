//! Delimited text point files (CSV, XYZ tables)
//!
//! ```csv
//! x,y,Z
//! 457000.0,5104000.0,312.4
//! 457010.0,5104000.0,313.1
//! ```

use super::PointReadOptions;
use crate::error::{Error, Result};
use crate::points::{PointSet, SamplePoint};
use std::io::Read;

/// Parse a delimited point table with a header row.
pub(crate) fn parse_delimited<R: Read>(
    reader: R,
    source_id: &str,
    options: &PointReadOptions,
) -> Result<PointSet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| Error::parse(source_id, format!("cannot read header row: {}", e)))?
        .clone();

    let x_idx = resolve_column(&headers, &options.x_field, source_id)?;
    let y_idx = resolve_column(&headers, &options.y_field, source_id)?;
    let z_idx = resolve_column(&headers, &options.z_field, source_id)?;

    let mut points = Vec::new();
    for (row_idx, result) in csv_reader.records().enumerate() {
        // Header is line 1
        let line = row_idx + 2;
        let record = result
            .map_err(|e| Error::parse(source_id, format!("line {}: {}", line, e)))?;

        if record.iter().all(str::is_empty) {
            continue;
        }

        let field = |idx: usize, name: &str| -> Result<f64> {
            let raw = record.get(idx).ok_or_else(|| {
                Error::parse(source_id, format!("line {}: missing '{}' field", line, name))
            })?;
            raw.parse::<f64>().map_err(|_| {
                Error::parse(
                    source_id,
                    format!("line {}: '{}' is not a number in field '{}'", line, raw, name),
                )
            })
        };

        points.push(SamplePoint::new(
            field(x_idx, &options.x_field)?,
            field(y_idx, &options.y_field)?,
            field(z_idx, &options.z_field)?,
        ));
    }

    if points.is_empty() {
        return Err(Error::parse(source_id, "no point records found"));
    }

    PointSet::new(points).map_err(|e| Error::parse(source_id, e.to_string()))
}

fn resolve_column(headers: &csv::StringRecord, name: &str, source_id: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::parse(source_id, format!("column '{}' not found", name)))
}
