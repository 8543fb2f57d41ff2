//! In-memory record table backed by CSV
//!
//! Rows are kept as raw `StringRecord`s so that columns the cleaning step
//! never touches round-trip verbatim: filtering is pure row selection, no
//! value is reparsed or reformatted on the way out.

use std::path::Path;

use csv::StringRecord;

use crate::error::{Error, Result};

/// An ordered table of rows parsed from a delimited-text file.
///
/// Header order and row order are preserved exactly as read; `retain`
/// only ever drops rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    /// 1-based input-file data row number for each entry of `rows`, so
    /// diagnostics keep naming original lines after earlier filter passes.
    row_numbers: Vec<usize>,
}

impl Dataset {
    /// Load a dataset from a CSV file on disk.
    ///
    /// Unreadable files and files that do not parse as a delimited table
    /// are resolution errors; column semantics are not checked here.
    pub async fn load(path: &Path) -> Result<Self> {
        let reference = path.display().to_string();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::resolution_with(&reference, "file unreadable", e))?;
        Self::from_csv(&content, &reference)
    }

    /// Parse a dataset from CSV text already in memory.
    pub fn from_csv(content: &str, reference: &str) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let headers = reader
            .headers()
            .map_err(|e| Error::resolution_with(reference, "file unreadable as a table", e))?
            .clone();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| {
                Error::resolution_with(reference, "file unreadable as a table", e)
            })?;
            rows.push(record);
        }

        let row_numbers = (1..=rows.len()).collect();
        Ok(Self {
            headers,
            rows,
            row_numbers,
        })
    }

    /// Header record, in input order.
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// Rows currently in the table, in input order.
    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by header name, or a schema error if absent.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| Error::schema(format!("required column '{name}' not found")))
    }

    /// Keep only the rows for which `keep` returns true, preserving order.
    ///
    /// The predicate receives the 1-based data row number from the input
    /// file, not the position within this pass, and is fallible so that a
    /// malformed cell aborts the pass instead of being silently dropped.
    /// Returns the number of surviving rows.
    pub fn try_retain<F>(&mut self, mut keep: F) -> Result<usize>
    where
        F: FnMut(usize, &StringRecord) -> Result<bool>,
    {
        let mut survivors = Vec::with_capacity(self.rows.len());
        let mut surviving_numbers = Vec::with_capacity(self.row_numbers.len());
        for (row, number) in self.rows.drain(..).zip(self.row_numbers.drain(..)) {
            if keep(number, &row)? {
                survivors.push(row);
                surviving_numbers.push(number);
            }
        }
        self.rows = survivors;
        self.row_numbers = surviving_numbers;
        Ok(self.rows.len())
    }

    /// Serialize the table (header row included) to CSV bytes.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }

    /// Serialize the table to a CSV file on disk.
    pub async fn write_to(&self, path: &Path) -> Result<()> {
        let bytes = self.to_csv_bytes()?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}
