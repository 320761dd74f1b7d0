use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use filmfeat::{run, CancelToken, FsShardStore, PipelineConfig};

/// Build the feature matrix and train/test partition from movie shards.
#[derive(Debug, Parser)]
#[command(name = "filmfeat", version, about)]
struct Cli {
    /// Directory holding `<shard>.json` files.
    #[arg(long, default_value = "data-stores")]
    data_dir: PathBuf,

    /// Shard ids to load; omit to load every shard in the store.
    #[arg(long = "shard")]
    shards: Vec<String>,

    /// Fraction of rows kept for training, in (0, 1].
    #[arg(long, default_value_t = 0.9)]
    split_ratio: f64,

    /// Record field holding the prediction target.
    #[arg(long, default_value = "rating")]
    label_field: String,

    /// RNG seed for the partitioner; omit for a fresh split each run.
    #[arg(long)]
    seed: Option<u64>,

    /// Smallest hidden-layer size in the downstream sweep.
    #[arg(long, default_value_t = 40)]
    hidden_min: usize,

    /// One past the largest hidden-layer size in the downstream sweep.
    #[arg(long, default_value_t = 60)]
    hidden_max: usize,

    /// Write the cleaned (matrix, labels) snapshot to this path.
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = FsShardStore::new(&cli.data_dir);
    let config = PipelineConfig {
        shards: if cli.shards.is_empty() {
            None
        } else {
            Some(cli.shards.clone())
        },
        label_field: cli.label_field.clone(),
        split_ratio: cli.split_ratio,
        seed: cli.seed,
        hidden_sizes: cli.hidden_min..cli.hidden_max,
        snapshot_path: cli.snapshot.clone(),
    };
    let hidden_sizes = config.hidden_sizes.clone();

    match run(&store, config, &CancelToken::new()) {
        Ok(output) => {
            info!(
                shards_read = ?output.report.load.shards_read,
                corrupt_shards = ?output.report.load.corrupt_shards,
                rows_loaded = output.report.rows_loaded,
                rows_dropped = output.report.rows_dropped,
                "dataset assembled"
            );
            info!(
                train_rows = output.report.train_rows,
                test_rows = output.report.test_rows,
                columns = output.columns.len(),
                categorical_columns = ?output.categorical_columns,
                hidden_sweep = ?hidden_sizes,
                "ready for model training"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "pipeline run failed");
            ExitCode::FAILURE
        }
    }
}
