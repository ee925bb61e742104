//! In-memory tabular dataset model.
//!
//! A `DataTable` is a column-named grid of loosely typed `Value` cells,
//! read from and written to CSV. Cells are untyped on purpose: raw extracts
//! mix numbers, dates, and text in the same column, and the missing-value
//! resolver may place a text default into a numeric column (the cleaning
//! contract allows this).

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::ToSql;

use crate::{Result, SalesError};

/// Date formats accepted when coercing raw text to a date.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y"];

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    /// Infer a value from a raw CSV field. Empty fields become `Null`;
    /// integer and float literals are parsed; everything else stays text
    /// (whitespace preserved; trimming is a cleaning decision).
    pub fn infer(field: &str) -> Value {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Value::Float(f);
        }
        Value::Text(field.to_string())
    }

    /// Parse a date from text, trying the accepted formats in order.
    pub fn parse_date(text: &str) -> Option<NaiveDate> {
        let trimmed = text.trim();
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value; `None` for text, dates, and nulls.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Canonical text rendering, used for CSV output and group keys.
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Integer(i) => ToSqlOutput::Owned((*i).into()),
            Value::Float(f) => ToSqlOutput::Owned((*f).into()),
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Date(d) => ToSqlOutput::Owned(rusqlite::types::Value::Text(
                d.format("%Y-%m-%d").to_string(),
            )),
        })
    }
}

impl FromSql for Value {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Float(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(_) => Value::Null,
        })
    }
}

/// A named-column grid of [`Value`] cells.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DataTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Vec<Value>] {
        &mut self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row; its arity must match the column list.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(SalesError::Configuration(format!(
                "row has {} values but table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Column index by name, or `UnknownColumn`.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| SalesError::UnknownColumn(name.to_string()))
    }

    pub fn value(&self, row: usize, col: usize) -> &Value {
        &self.rows[row][col]
    }

    /// Rename a column in place.
    pub fn rename_column(&mut self, from: &str, to: &str) -> Result<()> {
        let idx = self.require_column(from)?;
        self.columns[idx] = to.to_string();
        Ok(())
    }

    /// Project the table down to the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> Result<DataTable> {
        let indices = names
            .iter()
            .map(|n| self.require_column(n))
            .collect::<Result<Vec<_>>>()?;
        let mut out = DataTable::new(names.iter().map(|n| n.to_string()).collect());
        for row in &self.rows {
            out.rows
                .push(indices.iter().map(|&i| row[i].clone()).collect());
        }
        Ok(out)
    }

    /// Read a CSV file into a table. Fails with `SourceMissing` if the file
    /// does not exist; ragged rows are padded with nulls rather than
    /// failing the read.
    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataTable> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SalesError::SourceMissing(path.to_path_buf()));
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let width = columns.len();

        let mut table = DataTable::new(columns);
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<Value> = record.iter().map(Value::infer).collect();
            row.resize(width, Value::Null);
            row.truncate(width);
            table.rows.push(row);
        }

        tracing::debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "Read CSV"
        );
        Ok(table)
    }

    /// Write the table as CSV, creating parent directories as needed.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|v| v.render()))?;
        }
        writer.flush()?;

        tracing::debug!(path = %path.display(), rows = self.row_count(), "Wrote CSV");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_values() {
        assert_eq!(Value::infer(""), Value::Null);
        assert_eq!(Value::infer("  "), Value::Null);
        assert_eq!(Value::infer("42"), Value::Integer(42));
        assert_eq!(Value::infer("3.5"), Value::Float(3.5));
        assert_eq!(Value::infer(" hello "), Value::Text(" hello ".to_string()));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(Value::parse_date("2024-03-09"), Some(expected));
        assert_eq!(Value::parse_date("03/09/2024"), Some(expected));
        assert_eq!(Value::parse_date("not a date"), None);
    }

    #[test]
    fn test_select_and_rename() {
        let mut table = DataTable::new(vec!["a".into(), "b".into(), "c".into()]);
        table
            .push_row(vec![
                Value::Integer(1),
                Value::Text("x".into()),
                Value::Float(2.5),
            ])
            .unwrap();

        let projected = table.select(&["c", "a"]).unwrap();
        assert_eq!(projected.columns(), ["c", "a"]);
        assert_eq!(projected.value(0, 0), &Value::Float(2.5));

        assert!(table.select(&["missing"]).is_err());

        let mut renamed = table.clone();
        renamed.rename_column("b", "label").unwrap();
        assert!(renamed.column_index("label").is_some());
        assert!(renamed.column_index("b").is_none());
    }

    #[test]
    fn test_push_row_arity_check() {
        let mut table = DataTable::new(vec!["a".into()]);
        assert!(table.push_row(vec![Value::Null, Value::Null]).is_err());
        assert!(table.push_row(vec![Value::Integer(1)]).is_ok());
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.csv");

        let mut table = DataTable::new(vec!["id".into(), "name".into(), "amount".into()]);
        table
            .push_row(vec![
                Value::Integer(1),
                Value::Text("Ann".into()),
                Value::Float(10.5),
            ])
            .unwrap();
        table
            .push_row(vec![Value::Integer(2), Value::Null, Value::Integer(3)])
            .unwrap();
        table.write_csv(&path).unwrap();

        let read = DataTable::read_csv(&path).unwrap();
        assert_eq!(read, table);
    }

    #[test]
    fn test_read_csv_missing_file() {
        let err = DataTable::read_csv("/nonexistent/raw.csv").unwrap_err();
        assert!(matches!(err, SalesError::SourceMissing(_)));
    }
}
