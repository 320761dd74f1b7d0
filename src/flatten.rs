//! List-field flattening: explode, binarize, collapse, splice.
//!
//! Each list-valued field expands into one binary indicator column per
//! distinct category observed anywhere in the corpus. The vocabulary is
//! corpus-global and sorted lexicographically, so column order is
//! reproducible across runs regardless of corpus ordering. Row identity is
//! carried explicitly as a `(row_index, category)` pair through the whole
//! transform; the collapse step restores input row order by construction.

use std::collections::BTreeSet;

use rayon::prelude::*;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::errors::PipelineError;
use crate::matrix::FeatureMatrix;
use crate::record::ListField;
use crate::shape::{scalar_columns, ShapedRow};
use crate::types::{CategoryName, ColumnName};

/// Corpus-global, lexicographically sorted category set for one field.
///
/// A category appearing in only one row still gets a column; a field with no
/// categories anywhere yields zero columns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryVocabulary {
    field: ListField,
    categories: Vec<CategoryName>,
}

impl CategoryVocabulary {
    /// Scan the whole corpus for distinct categories of `field` (pass 1).
    pub fn scan(rows: &[ShapedRow], field: ListField) -> Self {
        let distinct: BTreeSet<&CategoryName> =
            rows.iter().flat_map(|row| row.list(field).iter()).collect();
        Self {
            field,
            categories: distinct.into_iter().cloned().collect(),
        }
    }

    /// Number of indicator columns this vocabulary defines.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// True when no category was observed for this field.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Column position for a category, if it was observed during the scan.
    pub fn position(&self, category: &str) -> Option<usize> {
        self.categories
            .binary_search_by(|probe| probe.as_str().cmp(category))
            .ok()
    }

    /// Indicator column names, `<field>=<category>`, in vocabulary order.
    pub fn column_names(&self) -> Vec<ColumnName> {
        self.categories
            .iter()
            .map(|category| format!("{}={}", self.field.field_name(), category))
            .collect()
    }
}

/// Explode one field into `(row_index, category)` pairs.
///
/// A row with an empty list contributes no pairs; it reappears as an
/// all-zero row after the collapse.
fn explode(rows: &[ShapedRow], field: ListField) -> Vec<(usize, CategoryName)> {
    rows.iter()
        .enumerate()
        .flat_map(|(row_index, row)| {
            row.list(field)
                .iter()
                .map(move |category| (row_index, category.clone()))
        })
        .collect()
}

/// Binarize exploded pairs against a fixed vocabulary (pass 2).
///
/// Each pair becomes a one-hot row tagged with its original row index.
fn binarize(
    pairs: &[(usize, CategoryName)],
    vocabulary: &CategoryVocabulary,
) -> Vec<(usize, Vec<f64>)> {
    pairs
        .iter()
        .filter_map(|(row_index, category)| {
            vocabulary.position(category).map(|pos| {
                let mut one_hot = vec![0.0; vocabulary.len()];
                one_hot[pos] = 1.0;
                (*row_index, one_hot)
            })
        })
        .collect()
}

/// Collapse binarized rows back to one indicator row per original row.
///
/// Grouping is keyed on the explicit row index and combined with
/// element-wise max, so duplicate categories within one row are idempotent
/// and rows with no pairs come out all-zero rather than dropped.
fn collapse(row_count: usize, binarized: &[(usize, Vec<f64>)], width: usize) -> Vec<Vec<f64>> {
    let mut collapsed = vec![vec![0.0; width]; row_count];
    for (row_index, one_hot) in binarized {
        let target = &mut collapsed[*row_index];
        for (slot, value) in target.iter_mut().zip(one_hot) {
            if *value > *slot {
                *slot = *value;
            }
        }
    }
    collapsed
}

/// Flatten one list-valued field into named indicator columns.
///
/// This is the single parametrized expand/binarize/collapse routine applied
/// to every field.
pub fn flatten_field(rows: &[ShapedRow], field: ListField) -> (Vec<ColumnName>, Vec<Vec<f64>>) {
    let vocabulary = CategoryVocabulary::scan(rows, field);
    let pairs = explode(rows, field);
    let binarized = binarize(&pairs, &vocabulary);
    let collapsed = collapse(rows.len(), &binarized, vocabulary.len());
    debug!(
        field = field.field_name(),
        categories = vocabulary.len(),
        pairs = pairs.len(),
        "flattened list field"
    );
    (vocabulary.column_names(), collapsed)
}

/// Build the full feature matrix: scalar columns followed by every field's
/// indicator block, spliced in fixed field order.
///
/// Fields are processed in parallel (they are independent); results are
/// joined and appended in [`ListField::ALL`] order so column order stays
/// deterministic.
pub fn flatten_corpus(
    rows: &[ShapedRow],
    cancel: &CancelToken,
) -> Result<FeatureMatrix, PipelineError> {
    cancel.check()?;
    let scalar_rows: Vec<Vec<f64>> = rows.iter().map(|row| row.scalars.clone()).collect();
    let mut matrix = FeatureMatrix::from_rows(scalar_columns(), scalar_rows)?;

    let blocks: Vec<(Vec<ColumnName>, Vec<Vec<f64>>)> = ListField::ALL
        .par_iter()
        .map(|&field| flatten_field(rows, field))
        .collect();

    cancel.check()?;
    for (names, block) in blocks {
        matrix.append_block(names, block)?;
    }
    Ok(matrix)
}
