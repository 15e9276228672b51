//! Labeled numeric storage shared by the entities
//!
//! - [`Table`]: rectangular rows-by-columns values with row and column names
//! - [`LowerTriangle`]: symmetric item-by-item values stored below the diagonal

use serde::{Deserialize, Serialize};

/// Shape errors raised when building tables
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableError {
    /// Row count does not match the number of row names
    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    /// A row has the wrong number of values
    #[error("row {row} has {found} values, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Lower triangle row has the wrong number of values
    #[error("lower triangle row {row} has {found} values, expected {expected}")]
    TriangleRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Rectangular table of values with named rows and columns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    row_names: Vec<String>,
    column_names: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl Table {
    /// Create a table, checking that every row matches the column count
    ///
    /// # Errors
    /// Returns [`TableError`] when the shape is inconsistent.
    pub fn new(
        row_names: Vec<String>,
        column_names: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, TableError> {
        if rows.len() != row_names.len() {
            return Err(TableError::RowCount {
                expected: row_names.len(),
                found: rows.len(),
            });
        }
        for (index, row) in rows.iter().enumerate() {
            if row.len() != column_names.len() {
                return Err(TableError::RowLength {
                    row: index,
                    expected: column_names.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self {
            row_names,
            column_names,
            rows,
        })
    }

    /// Table of zeros
    #[must_use]
    pub fn zeros(row_names: Vec<String>, column_names: Vec<String>) -> Self {
        let rows = vec![vec![0.0; column_names.len()]; row_names.len()];
        Self {
            row_names,
            column_names,
            rows,
        }
    }

    #[inline]
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.column_names.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn row_names(&self) -> &[String] {
        &self.row_names
    }

    #[inline]
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Value at `row`, `col`
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Mutable access to a single row
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> Option<&mut Vec<f64>> {
        self.rows.get_mut(row)
    }

    /// Iterate over one column
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(move |row| row.get(col).copied())
    }

    /// Mean of every column
    #[must_use]
    pub fn column_means(&self) -> Vec<f64> {
        if self.rows.is_empty() {
            return vec![0.0; self.ncols()];
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.rows.len() as f64;
        (0..self.ncols())
            .map(|col| self.column(col).sum::<f64>() / n)
            .collect()
    }

    /// Apply `f` to every value of a column
    pub fn map_column(&mut self, col: usize, f: impl Fn(f64) -> f64) {
        for row in &mut self.rows {
            if let Some(value) = row.get_mut(col) {
                *value = f(*value);
            }
        }
    }

    /// Apply `f` to every row in place
    pub fn map_rows(&mut self, mut f: impl FnMut(&mut [f64])) {
        for row in &mut self.rows {
            f(row);
        }
    }
}

/// Symmetric item-by-item values stored as a lower triangle
///
/// Row `i` holds the values between item `i + 1` and items `0..=i`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LowerTriangle {
    item_names: Vec<String>,
    item_labels: Vec<String>,
    values: Vec<Vec<f64>>,
}

impl LowerTriangle {
    /// Create a lower triangle, checking row lengths
    ///
    /// # Errors
    /// Returns [`TableError`] when rows do not form a lower triangle over the items.
    pub fn new(
        item_names: Vec<String>,
        item_labels: Vec<String>,
        values: Vec<Vec<f64>>,
    ) -> Result<Self, TableError> {
        let expected_rows = item_names.len().saturating_sub(1);
        if values.len() != expected_rows {
            return Err(TableError::RowCount {
                expected: expected_rows,
                found: values.len(),
            });
        }
        for (index, row) in values.iter().enumerate() {
            if row.len() != index + 1 {
                return Err(TableError::TriangleRow {
                    row: index,
                    expected: index + 1,
                    found: row.len(),
                });
            }
        }
        Ok(Self {
            item_names,
            item_labels,
            values,
        })
    }

    #[inline]
    #[must_use]
    pub fn nitems(&self) -> usize {
        self.item_names.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_names.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn item_names(&self) -> &[String] {
        &self.item_names
    }

    #[inline]
    #[must_use]
    pub fn item_labels(&self) -> &[String] {
        &self.item_labels
    }

    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Value between items `a` and `b`; `None` on the diagonal or out of range
    #[must_use]
    pub fn value(&self, a: usize, b: usize) -> Option<f64> {
        let (hi, lo) = if a > b { (a, b) } else { (b, a) };
        if hi == lo || hi == 0 {
            return None;
        }
        self.values.get(hi - 1).and_then(|row| row.get(lo)).copied()
    }

    /// Every off-diagonal pair `(a, b, value)` with `a > b`
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .flat_map(|(row, values)| {
                values
                    .iter()
                    .enumerate()
                    .map(move |(col, value)| (row + 1, col, *value))
            })
    }
}
