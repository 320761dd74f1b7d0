use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::errors::PipelineError;
use crate::record::RawRecord;
use crate::store::ShardStore;
use crate::types::ShardId;

/// What the loader actually read, reported for observability.
#[derive(Clone, Debug, Default)]
pub struct LoadReport {
    /// Shards read successfully, in read order.
    pub shards_read: Vec<ShardId>,
    /// Shards present but unreadable, skipped with a warning.
    pub corrupt_shards: Vec<ShardId>,
}

/// Concatenated corpus plus the report of how it was assembled.
#[derive(Clone, Debug)]
pub struct Corpus {
    /// All records across shards, intra-shard order preserved, no dedup.
    pub records: Vec<RawRecord>,
    /// Shard-level observability report.
    pub report: LoadReport,
}

/// Load raw records from `store`.
///
/// With `selector = Some(ids)`, shards that do not exist are silently
/// omitted; with `selector = None`, every discoverable shard is used.
/// Corrupt shards are skipped-and-warned. Fails only when the store itself
/// is unreachable or the run is cancelled.
pub fn load_corpus(
    store: &dyn ShardStore,
    selector: Option<&[ShardId]>,
    cancel: &CancelToken,
) -> Result<Corpus, PipelineError> {
    let shards: Vec<ShardId> = match selector {
        Some(ids) => ids
            .iter()
            .filter(|id| store.contains(id))
            .cloned()
            .collect(),
        None => store.list_shards()?,
    };
    info!(shard_count = shards.len(), ?shards, "shards selected");

    let mut records = Vec::new();
    let mut report = LoadReport::default();
    for shard in shards {
        cancel.check()?;
        match store.read_shard(&shard) {
            Ok(mut batch) => {
                records.append(&mut batch);
                report.shards_read.push(shard);
            }
            Err(err) => {
                warn!(shard = %shard, error = %err, "skipping corrupt shard");
                report.corrupt_shards.push(shard);
            }
        }
    }
    info!(
        rows = records.len(),
        shards_read = report.shards_read.len(),
        corrupt = report.corrupt_shards.len(),
        "corpus loaded"
    );
    Ok(Corpus { records, report })
}
