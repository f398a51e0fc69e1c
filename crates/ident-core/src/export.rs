//! # Export Formatter
//!
//! Converts issuance records into fixed-column rows and renders them as CSV.
//! Filtering (e.g. by SKU) is the caller's job: pass in only the records to
//! export.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::IssuanceRecord;

/// Column titles, in export order.
pub const HEADER: [&str; 6] = [
    "Code Type",
    "Prefix",
    "SKU",
    "Indicator",
    "Item Reference",
    "Generated Code",
];

/// The six column titles, in export order.
pub fn header() -> [&'static str; 6] {
    HEADER
}

/// One export row. Field order matches [`HEADER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExportRow {
    pub code_type: String,
    pub prefix: String,
    pub sku: String,
    /// Empty string when the record has no indicator.
    pub indicator: String,
    pub item_reference: String,
    pub generated_code: String,
}

impl ExportRow {
    /// Cells in column order.
    pub fn cells(&self) -> [&str; 6] {
        [
            &self.code_type,
            &self.prefix,
            &self.sku,
            &self.indicator,
            &self.item_reference,
            &self.generated_code,
        ]
    }
}

impl From<&IssuanceRecord> for ExportRow {
    fn from(record: &IssuanceRecord) -> Self {
        ExportRow {
            code_type: record.code_type.to_string(),
            prefix: record.prefix.clone(),
            sku: record.sku.clone(),
            indicator: record.indicator.clone().unwrap_or_default(),
            item_reference: record.item_reference.clone(),
            generated_code: record.generated_code.clone(),
        }
    }
}

/// Formats records into rows, one per record, preserving order.
pub fn format(records: &[IssuanceRecord]) -> Vec<ExportRow> {
    records.iter().map(ExportRow::from).collect()
}

/// Renders rows as CSV with a header line.
///
/// Every field is quoted and embedded quotes are doubled, so SKUs with
/// commas or quotes survive a spreadsheet import. Lines end with CRLF.
pub fn to_csv(rows: &[ExportRow]) -> String {
    let mut out = String::new();
    push_line(&mut out, HEADER);
    for row in rows {
        push_line(&mut out, row.cells());
    }
    out
}

fn push_line(out: &mut String, cells: [&str; 6]) {
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        csv_field(out, cell);
    }
    out.push_str("\r\n");
}

fn csv_field(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}
