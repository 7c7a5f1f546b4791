//! A small labelled table.
//!
//! Every input file shares one layout: a header row, the first column used as
//! the row index, and any number of data columns. Cells are kept as strings so
//! categorical columns (`Substrate`, `Isolate`) and numeric columns (`Time`,
//! `mu`) can live side by side; numeric access parses on demand.
//!
//! Column names are not required to be unique. Raw plate files each carry a
//! `Time` column, and after concatenation the table holds several of them.

use crate::error::AppError;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    index_name: String,
    columns: Vec<String>,
    index: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, padding short rows with empty cells.
    ///
    /// A row wider than the header is rejected.
    pub fn new(
        index_name: impl Into<String>,
        columns: Vec<String>,
        index: Vec<String>,
        mut rows: Vec<Vec<String>>,
    ) -> Result<Self, AppError> {
        if index.len() != rows.len() {
            return Err(AppError::input(format!(
                "Table index has {} labels but {} rows.",
                index.len(),
                rows.len()
            )));
        }

        let width = columns.len();
        for (i, row) in rows.iter_mut().enumerate() {
            if row.len() > width {
                return Err(AppError::input(format!(
                    "Row {} has {} fields but the header names {width} columns.",
                    i + 1,
                    row.len()
                )));
            }
            row.resize(width, String::new());
        }

        Ok(Self {
            index_name: index_name.into(),
            columns,
            index,
            rows,
        })
    }

    /// An empty table with the same header.
    pub fn empty_like(&self) -> Self {
        Self {
            index_name: self.index_name.clone(),
            columns: self.columns.clone(),
            index: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn index(&self) -> &[String] {
        &self.index
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the first column with this name.
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_position(name).is_some()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// All cells of a column as text.
    pub fn column_str(&self, name: &str) -> Result<Vec<&str>, AppError> {
        let col = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| row[col].as_str()).collect())
    }

    /// All cells of a column parsed as `f64`.
    ///
    /// Empty cells read as NaN; anything else that is not a number is an error.
    pub fn column_f64(&self, name: &str) -> Result<Vec<f64>, AppError> {
        let col = self.require_column(name)?;
        self.column_f64_at(col)
    }

    /// Numeric column by position (used where names repeat).
    pub fn column_f64_at(&self, col: usize) -> Result<Vec<f64>, AppError> {
        let name = self
            .columns
            .get(col)
            .ok_or_else(|| AppError::input(format!("Column position {col} is out of range.")))?;

        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                parse_cell(&row[col]).ok_or_else(|| {
                    AppError::input(format!(
                        "Non-numeric value '{}' in column `{name}` (row '{}').",
                        row[col], self.index[i]
                    ))
                })
            })
            .collect()
    }

    /// A new table holding only the given rows, in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> Self {
        let mut out = self.empty_like();
        for &i in rows {
            if let (Some(label), Some(row)) = (self.index.get(i), self.rows.get(i)) {
                out.index.push(label.clone());
                out.rows.push(row.clone());
            }
        }
        out
    }

    /// Stable ascending sort by a numeric column. NaN sorts last.
    pub fn sorted_by(&self, name: &str) -> Result<Self, AppError> {
        let keys = self.column_f64(name)?;
        let mut order: Vec<usize> = (0..self.n_rows()).collect();
        order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
        // `total_cmp` orders negative NaN first; push every NaN to the end.
        order.sort_by_key(|&i| keys[i].is_nan());
        Ok(self.take_rows(&order))
    }

    /// Append the rows of `other`, which must share this table's header.
    pub fn append_rows(&mut self, other: &Table) -> Result<(), AppError> {
        if other.columns != self.columns {
            return Err(AppError::input(format!(
                "Cannot stack tables with different columns: [{}] vs [{}].",
                self.columns.join(", "),
                other.columns.join(", ")
            )));
        }
        self.index.extend(other.index.iter().cloned());
        self.rows.extend(other.rows.iter().cloned());
        Ok(())
    }

    fn require_column(&self, name: &str) -> Result<usize, AppError> {
        self.column_position(name)
            .ok_or_else(|| AppError::input(format!("Missing required column: `{name}`")))
    }
}

/// Parse one cell the way the TSV inputs encode numbers.
pub fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Some(f64::NAN);
    }
    cell.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Table {
        Table::new(
            "",
            strings(&["Time", "mu", "Substrate"]),
            strings(&["0", "1", "2"]),
            vec![
                strings(&["1200", "0.5", "D-Sorbitol"]),
                strings(&["0", "0.1", "D-Sorbitol"]),
                strings(&["600", "0.3"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn short_rows_are_padded() {
        let t = sample();
        assert_eq!(t.cell(2, 2), Some(""));
    }

    #[test]
    fn wide_rows_are_rejected() {
        let err = Table::new(
            "",
            strings(&["a"]),
            strings(&["0"]),
            vec![strings(&["1", "2"])],
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn sorted_by_orders_rows_and_keeps_index() {
        let t = sample().sorted_by("Time").unwrap();
        assert_eq!(t.index(), &strings(&["1", "2", "0"])[..]);
        assert_eq!(t.column_f64("mu").unwrap(), vec![0.1, 0.3, 0.5]);
    }

    #[test]
    fn missing_column_is_an_input_error() {
        let err = sample().column_f64("Sigma").unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("Sigma"));
    }

    #[test]
    fn non_numeric_cells_are_reported() {
        let err = sample().column_f64("Substrate").unwrap_err();
        assert!(err.message().contains("D-Sorbitol"));
    }

    #[test]
    fn empty_cells_parse_as_nan() {
        assert!(parse_cell("").unwrap().is_nan());
        assert_eq!(parse_cell(" 1.5 "), Some(1.5));
        assert_eq!(parse_cell("abc"), None);
    }
}
