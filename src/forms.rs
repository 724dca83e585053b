//! Form submissions uploaded as CSV and the lead tracking layered on them.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::info;

use crate::csv::{parse_csv, rows_to_csv, CsvRow};
use crate::error::{CrmError, Result};
use crate::ids::{EntityKind, IdAllocator};
use crate::model::{FormRecord, LeadStatus, FORM_RESERVED_KEYS};

/// Headers shown ahead of the source columns in exports.
const EXPORT_TRACKING_COLUMNS: [&str; 2] = ["Llamado", "Estado"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormTable {
    /// Every key seen across the source rows, first occurrence first.
    pub headers: Vec<String>,
    pub records: Vec<FormRecord>,
}

impl FormTable {
    /// `headers` without the tracking keys.
    pub fn display_columns(&self) -> Vec<String> {
        strip_reserved(&self.headers)
    }
}

fn is_reserved(key: &str) -> bool {
    FORM_RESERVED_KEYS.contains(&key)
}

fn strip_reserved(keys: &[String]) -> Vec<String> {
    keys.iter()
        .filter(|key| !is_reserved(key.as_str()))
        .cloned()
        .collect()
}

/// Union of the keys of `rows`, in first-occurrence order.
pub fn header_union<'a, I, K>(rows: I) -> Vec<String>
where
    I: IntoIterator<Item = K>,
    K: IntoIterator<Item = &'a String>,
{
    let mut seen: IndexSet<String> = IndexSet::new();
    for keys in rows {
        for key in keys {
            if !seen.contains(key) {
                seen.insert(key.clone());
            }
        }
    }
    seen.into_iter().collect()
}

/// Turns parsed rows into tracked records. Each record keeps exactly the
/// pairs its own row had; ids come from one allocator batch.
pub fn normalize(rows: Vec<CsvRow>, ids: &mut IdAllocator) -> FormTable {
    let headers = header_union(rows.iter().map(|row| row.keys()));
    let issued = ids.allocate_batch(EntityKind::Form, rows.len());
    let records = rows
        .into_iter()
        .zip(issued)
        .map(|(row, id)| {
            let fields: IndexMap<String, String> = row
                .into_iter()
                .filter(|(key, _)| !is_reserved(key))
                .collect();
            FormRecord {
                id,
                called: false,
                status: LeadStatus::Pending,
                fields,
            }
        })
        .collect();
    FormTable { headers, records }
}

/// Columns to show for a set of records: the union of their source fields.
pub fn display_columns(records: &[FormRecord]) -> Vec<String> {
    strip_reserved(&header_union(
        records.iter().map(|record| record.fields.keys()),
    ))
}

/// Parses and normalizes an upload. Either every row loads or none does.
pub fn load_csv(text: &str, ids: &mut IdAllocator) -> Result<FormTable> {
    let parsed = parse_csv(text);
    if !parsed.errors.is_empty() {
        return Err(CrmError::CsvParse(
            parsed.errors.iter().map(ToString::to_string).collect(),
        ));
    }
    if parsed.rows.is_empty() {
        return Err(CrmError::CsvEmpty);
    }
    let table = normalize(parsed.rows, ids);
    info!(
        rows = table.records.len(),
        columns = table.headers.len(),
        "loaded form submissions"
    );
    Ok(table)
}

/// CSV text for `records`, tracking columns first. At most `row_limit` rows.
pub fn export_csv(records: &[FormRecord], row_limit: usize) -> String {
    let source_columns = display_columns(records);
    let mut columns: Vec<String> = EXPORT_TRACKING_COLUMNS
        .iter()
        .map(|v| (*v).to_string())
        .collect();
    columns.extend(source_columns.iter().cloned());

    let rows: Vec<Vec<String>> = records
        .iter()
        .take(row_limit)
        .map(|record| {
            let mut line = Vec::with_capacity(columns.len());
            line.push(if record.called { "Sí" } else { "No" }.to_string());
            line.push(record.status.label().to_string());
            for column in &source_columns {
                line.push(record.field(column).unwrap_or_default().to_string());
            }
            line
        })
        .collect();
    info!(rows = rows.len(), "exported form submissions");
    rows_to_csv(&columns, &rows)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadCounts {
    pub called: usize,
    pub in_process: usize,
    pub signed: usize,
}

pub fn lead_counts(records: &[FormRecord]) -> LeadCounts {
    records.iter().fold(LeadCounts::default(), |mut acc, record| {
        if record.called {
            acc.called += 1;
        }
        match record.status {
            LeadStatus::InProcess => acc.in_process += 1,
            LeadStatus::Signed => acc.signed += 1,
            LeadStatus::Pending | LeadStatus::Contacted => {}
        }
        acc
    })
}
