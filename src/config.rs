use std::ops::Range;
use std::path::PathBuf;

use crate::errors::PipelineError;
use crate::types::{FieldName, ShardId};

/// Top-level pipeline configuration.
///
/// Everything the original run hard-coded is explicit here: which shards to
/// read, which field is the label, the split ratio, the RNG seed, and the
/// hidden-layer-size sweep handed to the downstream trainer.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    /// Shards to load; `None` discovers every shard in the store.
    pub shards: Option<Vec<ShardId>>,
    /// Record field holding the prediction target.
    pub label_field: FieldName,
    /// Fraction of rows kept for training, in `(0, 1]`.
    pub split_ratio: f64,
    /// RNG seed for the partitioner; `None` draws fresh entropy per run.
    pub seed: Option<u64>,
    /// Hidden-layer sizes the downstream trainer sweeps over.
    pub hidden_sizes: Range<usize>,
    /// Optional path for the cleaned `(matrix, labels)` snapshot artifact.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            shards: None,
            label_field: "rating".to_string(),
            split_ratio: 0.9,
            seed: None,
            hidden_sizes: 40..60,
            snapshot_path: None,
        }
    }
}

impl PipelineConfig {
    /// Validate the configuration before a run.
    pub fn validated(self) -> Result<Self, PipelineError> {
        if !self.split_ratio.is_finite() || self.split_ratio <= 0.0 || self.split_ratio > 1.0 {
            return Err(PipelineError::Configuration(format!(
                "split ratio must lie in (0.0, 1.0], got {}",
                self.split_ratio
            )));
        }
        if self.label_field.is_empty() {
            return Err(PipelineError::Configuration(
                "label field must not be empty".into(),
            ));
        }
        if self.hidden_sizes.is_empty() {
            return Err(PipelineError::Configuration(
                "hidden-size sweep range must not be empty".into(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PipelineConfig::default().validated().is_ok());
    }

    #[test]
    fn zero_split_ratio_is_rejected() {
        let config = PipelineConfig {
            split_ratio: 0.0,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validated(),
            Err(PipelineError::Configuration(_))
        ));
    }

    #[test]
    fn ratio_of_exactly_one_is_allowed() {
        let config = PipelineConfig {
            split_ratio: 1.0,
            ..PipelineConfig::default()
        };
        assert!(config.validated().is_ok());
    }

    #[test]
    fn empty_label_field_is_rejected() {
        let config = PipelineConfig {
            label_field: String::new(),
            ..PipelineConfig::default()
        };
        assert!(config.validated().is_err());
    }

    #[test]
    fn empty_hidden_size_sweep_is_rejected() {
        let config = PipelineConfig {
            hidden_sizes: 10..10,
            ..PipelineConfig::default()
        };
        assert!(config.validated().is_err());
    }
}
