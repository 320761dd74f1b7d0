//! Row shaping: one raw record in, one validated `(features, label)` pair or
//! one tagged error out.
//!
//! Shaping is pure and per-record; the aggregate step compacts survivors into
//! two index-aligned lists and reports how many rows were dropped. The
//! relative order of surviving rows always matches the label vector.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::errors::{PipelineError, ShapeError};
use crate::record::{FieldValue, ListField, RawRecord};
use crate::types::{CategoryName, ColumnName, Label};

/// Record field holding the release date, source of the derived year/month.
const RELEASE_FIELD: &str = "released";

/// Scalar numeric fields extracted directly from the record.
const NUMERIC_FIELDS: [&str; 4] = ["budget", "popularity", "runtime", "vote_count"];

/// Names of the scalar feature columns, in matrix order.
///
/// The derived `year`/`month` columns follow the direct numeric fields.
pub fn scalar_columns() -> Vec<ColumnName> {
    let mut columns: Vec<ColumnName> = NUMERIC_FIELDS.iter().map(|f| f.to_string()).collect();
    columns.push("year".to_string());
    columns.push("month".to_string());
    columns
}

/// Positions of categorical scalar columns within [`scalar_columns`].
///
/// These are the pre-flattening column positions a downstream categorical
/// encoder needs: year and month are category-like despite being numeric.
pub fn categorical_scalar_positions() -> &'static [usize] {
    // year, month
    &[4, 5]
}

/// The validated per-record feature tuple: scalar features plus the raw
/// category lists the flattener will expand.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedRow {
    /// Scalar features in [`scalar_columns`] order; NaN marks a missing value
    /// for the downstream imputer.
    pub scalars: Vec<f64>,
    /// Category lists in [`ListField::ALL`] order.
    lists: [Vec<CategoryName>; 4],
}

impl ShapedRow {
    /// Category list for one list-valued field.
    pub fn list(&self, field: ListField) -> &[CategoryName] {
        let idx = ListField::ALL
            .iter()
            .position(|f| *f == field)
            .unwrap_or(0);
        &self.lists[idx]
    }
}

/// Aligned output of the aggregate shaping step.
#[derive(Clone, Debug)]
pub struct ShapedCorpus {
    /// Surviving rows, in input order.
    pub rows: Vec<ShapedRow>,
    /// Labels aligned 1:1 with `rows`.
    pub labels: Vec<Label>,
    /// Number of rows dropped because shaping failed.
    pub dropped: usize,
}

/// Shape one raw record into a `(feature tuple, label)` pair.
///
/// Missing scalar fields become NaN; missing list fields become empty lists.
/// A missing or malformed label, a malformed numeric or date field, or a
/// non-list value in a list field are unrecoverable and drop the row.
pub fn shape_record(
    record: &RawRecord,
    label_field: &str,
) -> Result<(ShapedRow, Label), ShapeError> {
    let label = match record.get(label_field) {
        None => return Err(ShapeError::MissingLabel(label_field.to_string())),
        Some(value) => value.as_number().filter(|n| n.is_finite()).ok_or_else(|| {
            ShapeError::MalformedLabel {
                field: label_field.to_string(),
            }
        })?,
    };

    let mut scalars = Vec::with_capacity(NUMERIC_FIELDS.len() + 2);
    for field in NUMERIC_FIELDS {
        scalars.push(numeric_or_nan(record, field)?);
    }
    let (year, month) = release_year_month(record)?;
    scalars.push(year);
    scalars.push(month);

    let mut lists: [Vec<CategoryName>; 4] = Default::default();
    for (idx, field) in ListField::ALL.iter().enumerate() {
        lists[idx] = match record.get(field.field_name()) {
            None => Vec::new(),
            Some(FieldValue::List(values)) => values.clone(),
            Some(_) => {
                return Err(ShapeError::MalformedList {
                    field: field.field_name().to_string(),
                })
            }
        };
    }

    Ok((ShapedRow { scalars, lists }, label))
}

/// Shape every record, dropping failures while keeping survivors aligned.
///
/// Fails with [`PipelineError::EmptyCorpus`] when nothing survives.
pub fn shape_corpus(
    records: &[RawRecord],
    label_field: &str,
) -> Result<ShapedCorpus, PipelineError> {
    let mut rows = Vec::with_capacity(records.len());
    let mut labels = Vec::with_capacity(records.len());
    let mut dropped = 0usize;
    for record in records {
        match shape_record(record, label_field) {
            Ok((row, label)) => {
                rows.push(row);
                labels.push(label);
            }
            Err(err) => {
                debug!(error = %err, "dropping unshapeable row");
                dropped += 1;
            }
        }
    }
    info!(
        survivors = rows.len(),
        dropped, "shaping removed malformed rows"
    );
    if rows.is_empty() {
        return Err(PipelineError::EmptyCorpus);
    }
    debug_assert_eq!(rows.len(), labels.len());
    Ok(ShapedCorpus {
        rows,
        labels,
        dropped,
    })
}

fn numeric_or_nan(record: &RawRecord, field: &str) -> Result<f64, ShapeError> {
    match record.get(field) {
        None => Ok(f64::NAN),
        Some(FieldValue::Number(value)) => Ok(*value),
        Some(_) => Err(ShapeError::MalformedNumeric {
            field: field.to_string(),
        }),
    }
}

/// Derive `(year, month)` from the release date field.
///
/// Missing field → both NaN; present but unparseable → shape error.
fn release_year_month(record: &RawRecord) -> Result<(f64, f64), ShapeError> {
    let text = match record.get(RELEASE_FIELD) {
        None => return Ok((f64::NAN, f64::NAN)),
        Some(value) => value.as_text().ok_or_else(|| ShapeError::MalformedDate {
            field: RELEASE_FIELD.to_string(),
            value: format!("{value:?}"),
        })?,
    };
    let date =
        NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| ShapeError::MalformedDate {
            field: RELEASE_FIELD.to_string(),
            value: text.to_string(),
        })?;
    Ok((f64::from(date.year()), f64::from(date.month())))
}
