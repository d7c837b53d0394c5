use chrono::{NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ProcessingError;
use crate::record::Record;

/// Rendering of a normalised datetime
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

// chrono's %.f takes any number of digits; the log format allows one to six
static DATETIME_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{1,6}Z$").unwrap());

/// Ordered records, built one line at a time
#[derive(Debug, Default, Clone)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Close the table. An empty table is the "nothing matched" condition.
    pub fn finish(self) -> Result<NormalizedTable, ProcessingError> {
        if self.records.is_empty() {
            return Err(ProcessingError::NoRecords);
        }
        Ok(self.normalize_datetimes())
    }

    /// Parse every `datetime`; values that do not fit become `None`
    pub fn normalize_datetimes(self) -> NormalizedTable {
        let rows = self
            .records
            .into_iter()
            .map(|record| NormalizedRow {
                timestamp: parse_datetime(&record.datetime),
                record,
            })
            .collect();
        NormalizedTable { rows }
    }
}

/// A record paired with its parsed timestamp; `None` marks no value
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    pub timestamp: Option<NaiveDateTime>,
    pub record: Record,
}

impl NormalizedRow {
    pub fn formatted_datetime(&self) -> String {
        self.timestamp
            .map(|ts| format_datetime(&ts))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedTable {
    rows: Vec<NormalizedRow>,
}

impl NormalizedTable {
    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if !DATETIME_SHAPE.is_match(value) {
        return None;
    }
    // chrono admits second 60 as a leap second; the log never carries one
    NaiveDateTime::parse_from_str(value, PARSE_FORMAT)
        .ok()
        .filter(|ts| ts.nanosecond() < 1_000_000_000)
}

pub fn format_datetime(ts: &NaiveDateTime) -> String {
    ts.format(DATETIME_FORMAT).to_string()
}
