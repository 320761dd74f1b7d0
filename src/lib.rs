#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Cooperative cancellation for the unbounded pipeline stages.
pub mod cancel;
/// Pipeline configuration and validation.
pub mod config;
/// List-field flattening: explode, binarize, collapse, splice.
pub mod flatten;
/// Corpus loading from shard stores.
pub mod loader;
/// Rectangular feature matrix with named columns.
pub mod matrix;
/// Train/test partitioning and k-fold splitting.
pub mod partition;
/// End-to-end pipeline wiring and the model-assembly boundary.
pub mod pipeline;
/// Raw record and field value types.
pub mod record;
/// Row shaping and the scalar feature schema.
pub mod shape;
/// Shard store trait and built-in stores.
pub mod store;
/// Shared type aliases.
pub mod types;

mod errors;

pub use cancel::CancelToken;
pub use config::PipelineConfig;
pub use errors::{PipelineError, ShapeError, ShardReadError};
pub use flatten::{flatten_corpus, flatten_field, CategoryVocabulary};
pub use loader::{load_corpus, Corpus, LoadReport};
pub use matrix::FeatureMatrix;
pub use partition::{k_fold, train_test_split, Dataset};
pub use pipeline::{assemble, run, write_snapshot, ModelInput, RunOutput, RunReport};
pub use record::{FieldValue, ListField, RawRecord};
pub use shape::{shape_corpus, shape_record, ShapedCorpus, ShapedRow};
pub use store::{FsShardStore, InMemoryShardStore, ShardStore};
pub use types::{CategoryName, ColumnName, FieldName, Label, ShardId};
