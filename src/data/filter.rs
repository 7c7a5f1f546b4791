//! Row selection by categorical criteria.
//!
//! A `Criteria` maps column names to one or more accepted values. A row is
//! kept when, for every named column, its cell is among the accepted values.
//! Filtering never fails: an unmatched criterion (including one naming a
//! column the table does not have) just yields an empty table.

use std::collections::BTreeMap;
use std::fmt;

use crate::data::table::{Table, parse_cell};
use crate::error::AppError;

/// One accepted value for a column.
#[derive(Debug, Clone, PartialEq)]
pub enum CriterionValue {
    /// Matches a cell with exactly this (trimmed) text.
    Text(String),
    /// Matches a cell whose text parses to this number (`1` matches `1.0`).
    Number(f64),
}

impl CriterionValue {
    /// Read a value from user text, recognising numbers.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Number(v),
            _ => Self::Text(raw.to_string()),
        }
    }

    pub fn matches(&self, cell: &str) -> bool {
        match self {
            Self::Text(text) => cell.trim() == text,
            Self::Number(n) => parse_cell(cell).is_some_and(|v| v == *n),
        }
    }
}

impl fmt::Display for CriterionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => write!(f, "{text}"),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for CriterionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CriterionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CriterionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CriterionValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for CriterionValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<u32> for CriterionValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

/// Column name -> accepted values.
///
/// A single value is stored as a one-element set, so `with("PM", 1)` and
/// `with_any("PM", [1])` are the same criterion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    accepted: BTreeMap<String, Vec<CriterionValue>>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept exactly one value for `column` (replacing any earlier entry).
    pub fn with(self, column: impl Into<String>, value: impl Into<CriterionValue>) -> Self {
        self.with_any(column, [value])
    }

    /// Accept any of `values` for `column` (replacing any earlier entry).
    pub fn with_any<V: Into<CriterionValue>>(
        mut self,
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.accepted
            .insert(column.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Parse `column=value[,value...]`.
    pub fn parse_entry(entry: &str) -> Result<(String, Vec<CriterionValue>), AppError> {
        let (column, values) = entry.split_once('=').ok_or_else(|| {
            AppError::input(format!("Invalid filter '{entry}': expected `column=value[,value...]`."))
        })?;
        let column = column.trim();
        if column.is_empty() {
            return Err(AppError::input(format!("Invalid filter '{entry}': empty column name.")));
        }
        let values: Vec<CriterionValue> = values
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(CriterionValue::parse)
            .collect();
        if values.is_empty() {
            return Err(AppError::input(format!("Invalid filter '{entry}': no values given.")));
        }
        Ok((column.to_string(), values))
    }

    /// Add every entry of `other`, which wins on shared columns.
    pub fn merged(mut self, other: &Criteria) -> Self {
        for (column, values) in &other.accepted {
            self.accepted.insert(column.clone(), values.clone());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.accepted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&[CriterionValue]> {
        self.accepted.get(column).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CriterionValue])> {
        self.accepted.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Does row `row` of `table` satisfy every criterion?
    pub fn matches_row(&self, table: &Table, row: usize) -> bool {
        self.accepted.iter().all(|(column, values)| {
            let Some(col) = table.column_position(column) else {
                return false;
            };
            let Some(cell) = table.cell(row, col) else {
                return false;
            };
            values.iter().any(|v| v.matches(cell))
        })
    }
}

impl FromIterator<(String, Vec<CriterionValue>)> for Criteria {
    fn from_iter<T: IntoIterator<Item = (String, Vec<CriterionValue>)>>(iter: T) -> Self {
        Self {
            accepted: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .accepted
            .iter()
            .map(|(column, values)| {
                let values: Vec<String> = values.iter().map(ToString::to_string).collect();
                format!("{column}={}", values.join("|"))
            })
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Positions of the rows of `table` matching every criterion, ascending.
pub fn matching_rows(table: &Table, criteria: &Criteria) -> Vec<usize> {
    (0..table.n_rows())
        .filter(|&row| criteria.matches_row(table, row))
        .collect()
}

/// Rows of `table` matching every criterion, in their original order.
pub fn subset(table: &Table, criteria: &Criteria) -> Table {
    table.take_rows(&matching_rows(table, criteria))
}
