//! Consistency auditor.
//!
//! Purely observational: snapshots the structural facts of a table
//! (row count, per-column null counts, inferred column types) so the
//! before/after effect of a cleaning pass can be verified. It never
//! repairs anything and it cannot fail.

use smartsales_core::{DataTable, Value};

/// Inferred type of a column, from the kinds of its non-null cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// No non-null values observed.
    Empty,
    Integer,
    Float,
    Text,
    Date,
    /// More than one value kind present.
    Mixed,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKind::Empty => write!(f, "empty"),
            ColumnKind::Integer => write!(f, "integer"),
            ColumnKind::Float => write!(f, "float"),
            ColumnKind::Text => write!(f, "text"),
            ColumnKind::Date => write!(f, "date"),
            ColumnKind::Mixed => write!(f, "mixed"),
        }
    }
}

/// Per-column structural facts.
#[derive(Debug, Clone)]
pub struct ColumnAudit {
    pub name: String,
    pub null_count: usize,
    pub kind: ColumnKind,
}

/// Structural snapshot of a table.
#[derive(Debug, Clone)]
pub struct ConsistencyReport {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnAudit>,
}

impl ConsistencyReport {
    pub fn total_nulls(&self) -> usize {
        self.columns.iter().map(|c| c.null_count).sum()
    }

    /// Log the snapshot at info level, one line per column.
    pub fn log(&self, stage: &str) {
        tracing::info!(
            stage,
            rows = self.row_count,
            columns = self.column_count,
            total_nulls = self.total_nulls(),
            "Consistency audit"
        );
        for col in &self.columns {
            tracing::info!(
                stage,
                column = %col.name,
                kind = %col.kind,
                nulls = col.null_count,
                "Column audit"
            );
        }
    }
}

fn kind_of(value: &Value) -> ColumnKind {
    match value {
        Value::Null => ColumnKind::Empty,
        Value::Integer(_) => ColumnKind::Integer,
        Value::Float(_) => ColumnKind::Float,
        Value::Text(_) => ColumnKind::Text,
        Value::Date(_) => ColumnKind::Date,
    }
}

/// Snapshot a table's structure. Integer and float cells in the same
/// column report as float (numeric upcast); any other combination is mixed.
pub fn audit(table: &DataTable) -> ConsistencyReport {
    let mut columns = Vec::with_capacity(table.column_count());
    for (idx, name) in table.columns().iter().enumerate() {
        let mut null_count = 0usize;
        let mut kind = ColumnKind::Empty;
        for row in table.rows() {
            let cell = &row[idx];
            if cell.is_null() {
                null_count += 1;
                continue;
            }
            let cell_kind = kind_of(cell);
            kind = match (kind, cell_kind) {
                (ColumnKind::Empty, k) => k,
                (k, ck) if k == ck => k,
                (ColumnKind::Integer, ColumnKind::Float)
                | (ColumnKind::Float, ColumnKind::Integer) => ColumnKind::Float,
                _ => ColumnKind::Mixed,
            };
        }
        columns.push(ColumnAudit {
            name: name.clone(),
            null_count,
            kind,
        });
    }

    ConsistencyReport {
        row_count: table.row_count(),
        column_count: table.column_count(),
        columns,
    }
}
