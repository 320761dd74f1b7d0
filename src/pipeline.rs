//! End-to-end pipeline wiring: load, shape, flatten, partition.
//!
//! The model-assembly boundary is [`ModelInput`]: a rectangular numeric
//! matrix with stable column order, an aligned label vector, and the fixed
//! positions of categorical scalar columns for the downstream encoder.
//! Imputation, scaling, dimensionality reduction, and the regressor itself
//! live on the other side of that boundary.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cancel::CancelToken;
use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::flatten::flatten_corpus;
use crate::loader::{load_corpus, LoadReport};
use crate::matrix::FeatureMatrix;
use crate::partition::{train_test_split, Dataset};
use crate::shape::{categorical_scalar_positions, shape_corpus};
use crate::store::ShardStore;
use crate::types::Label;

/// The sole contract with the training/prediction subsystem.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelInput {
    /// Rectangular numeric feature table; NaN is the missing-value sentinel
    /// the downstream imputer recognizes.
    pub matrix: FeatureMatrix,
    /// Labels aligned 1:1 with matrix rows, independently normalizable.
    pub labels: Vec<Label>,
    /// Column positions of categorical scalar features for the downstream
    /// encoder.
    pub categorical_columns: Vec<usize>,
}

/// User-visible counts for one run; absence of this reporting would hide
/// silent data loss.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Shard-level loader observability.
    pub load: LoadReport,
    /// Raw rows loaded across all shards.
    pub rows_loaded: usize,
    /// Rows dropped during shaping.
    pub rows_dropped: usize,
    /// Training rows after the split.
    pub train_rows: usize,
    /// Test rows after the split.
    pub test_rows: usize,
}

/// Output of a full pipeline run.
#[derive(Clone, Debug)]
pub struct RunOutput {
    /// Training partition.
    pub train: Dataset,
    /// Test partition, disjoint from `train`.
    pub test: Dataset,
    /// Column names of the feature matrix both partitions came from.
    pub columns: Vec<crate::types::ColumnName>,
    /// Categorical scalar column positions, passed through from assembly.
    pub categorical_columns: Vec<usize>,
    /// Run counts.
    pub report: RunReport,
}

/// Load, shape, and flatten: everything up to the model-assembly boundary.
pub fn assemble(
    store: &dyn ShardStore,
    config: &PipelineConfig,
    cancel: &CancelToken,
) -> Result<(ModelInput, LoadReport, usize, usize), PipelineError> {
    let corpus = load_corpus(store, config.shards.as_deref(), cancel)?;
    let rows_loaded = corpus.records.len();
    let shaped = shape_corpus(&corpus.records, &config.label_field)?;
    let matrix = flatten_corpus(&shaped.rows, cancel)?;
    debug_assert_eq!(matrix.height(), shaped.labels.len());
    let input = ModelInput {
        matrix,
        labels: shaped.labels,
        categorical_columns: categorical_scalar_positions().to_vec(),
    };
    Ok((input, corpus.report, rows_loaded, shaped.dropped))
}

/// Run the pipeline end to end and partition the result.
pub fn run(
    store: &dyn ShardStore,
    config: PipelineConfig,
    cancel: &CancelToken,
) -> Result<RunOutput, PipelineError> {
    let config = config.validated()?;
    let (input, load, rows_loaded, rows_dropped) = assemble(store, &config, cancel)?;

    if let Some(path) = &config.snapshot_path {
        write_snapshot(path, &input)?;
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let categorical_columns = input.categorical_columns;
    let (columns, rows) = input.matrix.into_parts();
    let (train, test) = train_test_split(rows, input.labels, config.split_ratio, &mut rng)?;

    info!(
        rows_loaded,
        rows_dropped,
        train_rows = train.len(),
        test_rows = test.len(),
        "pipeline run complete"
    );
    let report = RunReport {
        load,
        rows_loaded,
        rows_dropped,
        train_rows: train.len(),
        test_rows: test.len(),
    };
    Ok(RunOutput {
        train,
        test,
        columns,
        categorical_columns,
        report,
    })
}

/// Write the cleaned `(matrix, labels)` pair as a JSON side artifact.
///
/// The snapshot is for inspection and reuse by other tools; this pipeline
/// never reads it back.
pub fn write_snapshot(path: &Path, input: &ModelInput) -> Result<(), PipelineError> {
    let payload = serde_json::to_vec_pretty(input).map_err(|err| {
        PipelineError::Configuration(format!("snapshot serialization failed: {err}"))
    })?;
    fs::write(path, payload)?;
    info!(path = %path.display(), "wrote cleaned-data snapshot");
    Ok(())
}
