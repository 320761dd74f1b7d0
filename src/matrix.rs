use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;
use crate::types::ColumnName;

/// Rectangular numeric feature table with named, stably ordered columns.
///
/// Rows stay in the order they were created in; appending a column block
/// never reorders or drops rows, so row index `i` always corresponds to
/// label index `i`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    columns: Vec<ColumnName>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// A matrix of `height` rows and zero columns.
    pub fn empty(height: usize) -> Self {
        Self {
            columns: Vec::new(),
            rows: vec![Vec::new(); height],
        }
    }

    /// Build a matrix from named columns and row data.
    ///
    /// Fails when any row width disagrees with the column count.
    pub fn from_rows(
        columns: Vec<ColumnName>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, PipelineError> {
        for row in &rows {
            if row.len() != columns.len() {
                return Err(PipelineError::Configuration(format!(
                    "ragged feature matrix: row has {} values, expected {}",
                    row.len(),
                    columns.len()
                )));
            }
        }
        Ok(Self { columns, rows })
    }

    /// Append a block of columns, one value vector per existing row.
    ///
    /// Fails when the block height disagrees with the matrix height or the
    /// block is ragged.
    pub fn append_block(
        &mut self,
        names: Vec<ColumnName>,
        block: Vec<Vec<f64>>,
    ) -> Result<(), PipelineError> {
        if block.len() != self.rows.len() {
            return Err(PipelineError::Configuration(format!(
                "column block has {} rows, matrix has {}",
                block.len(),
                self.rows.len()
            )));
        }
        for (row, extra) in self.rows.iter_mut().zip(block) {
            if extra.len() != names.len() {
                return Err(PipelineError::Configuration(format!(
                    "ragged column block: row has {} values, expected {}",
                    extra.len(),
                    names.len()
                )));
            }
            row.extend(extra);
        }
        self.columns.extend(names);
        Ok(())
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Column names in matrix order.
    pub fn columns(&self) -> &[ColumnName] {
        &self.columns
    }

    /// Row data in row order.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Position of a named column, if present.
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// All values of one column, top to bottom.
    pub fn column_values(&self, idx: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[idx]).collect()
    }

    /// Consume the matrix into `(columns, rows)`.
    pub fn into_parts(self) -> (Vec<ColumnName>, Vec<Vec<f64>>) {
        (self.columns, self.rows)
    }
}
