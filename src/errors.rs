use std::io;

use thiserror::Error;

use crate::types::{FieldName, ShardId};

/// Fatal pipeline failures that abort a run.
///
/// Per-row problems are [`ShapeError`] and per-shard problems are
/// [`ShardReadError`]; both are recovered locally and never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("shard store is unreachable: {reason}")]
    StoreUnavailable { reason: String },
    #[error(
        "feature/label misalignment entering the partitioner ({features} features, {labels} labels)"
    )]
    LengthMismatch { features: usize, labels: usize },
    #[error("no usable rows after shaping; nothing to train on")]
    EmptyCorpus,
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("run cancelled")]
    Cancelled,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Per-row shaping failures.
///
/// A `ShapeError` drops exactly one row; the aggregate step counts and
/// reports how many rows were dropped this way.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("record is missing the label field '{0}'")]
    MissingLabel(FieldName),
    #[error("label field '{field}' is not numeric")]
    MalformedLabel { field: FieldName },
    #[error("numeric field '{field}' is not numeric")]
    MalformedNumeric { field: FieldName },
    #[error("date field '{field}' could not be parsed: {value}")]
    MalformedDate { field: FieldName, value: String },
    #[error("list field '{field}' does not hold a list of categories")]
    MalformedList { field: FieldName },
}

/// Per-shard read failures.
///
/// A corrupt shard is skipped with a warning rather than aborting the run;
/// the loader reports which shards were dropped.
#[derive(Debug, Error)]
pub enum ShardReadError {
    #[error("shard '{shard}' is unreadable: {reason}")]
    Corrupt { shard: ShardId, reason: String },
}
