//! CSV and JSON writers for raw bars and augmented rows.
//!
//! Undefined indicator values become empty CSV fields and JSON nulls.

use crate::domain::PriceSeries;
use crate::pipeline::{Column, IndicatorRow, PipelineParams};
use serde_json::{json, Map, Value};
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encode failed: {0}")]
    Json(#[from] serde_json::Error),
}

const BAR_HEADERS: [&str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];

/// Write bars in the same layout the CSV loader reads.
pub fn write_bars_csv<W: Write>(series: &PriceSeries, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(BAR_HEADERS)?;
    for bar in series.bars() {
        wtr.write_record([
            bar.date.to_string(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write augmented rows with the bar columns followed by `columns`.
pub fn write_rows_csv<W: Write>(
    rows: &[IndicatorRow],
    columns: &[Column],
    params: &PipelineParams,
    writer: W,
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let header: Vec<String> = BAR_HEADERS
        .iter()
        .map(|h| h.to_string())
        .chain(columns.iter().map(|c| c.label(params)))
        .collect();
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.date.to_string(),
            row.open.to_string(),
            row.high.to_string(),
            row.low.to_string(),
            row.close.to_string(),
            row.volume.to_string(),
        ];
        record.extend(
            columns
                .iter()
                .map(|&c| row.get(c).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// JSON array of row objects, keyed by column label, limited to `columns`.
pub fn rows_to_json(rows: &[IndicatorRow], columns: &[Column], params: &PipelineParams) -> Value {
    Value::Array(
        rows.iter()
            .map(|row| {
                let mut obj = Map::new();
                obj.insert("Date".into(), json!(row.date.to_string()));
                obj.insert("Open".into(), json!(row.open));
                obj.insert("High".into(), json!(row.high));
                obj.insert("Low".into(), json!(row.low));
                obj.insert("Close".into(), json!(row.close));
                obj.insert("Volume".into(), json!(row.volume));
                for &column in columns {
                    obj.insert(column.label(params), json!(row.get(column)));
                }
                Value::Object(obj)
            })
            .collect(),
    )
}
