//! Turns index entries into creature records with computed weaknesses

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::api::CatalogSource;
use crate::state::{CreatureRecord, IndexEntry};

/// Hydrate a single entry.
///
/// Returns `None` when the detail fetch fails. Type lookups run one after
/// another; a failed lookup drops only that type's contribution.
pub async fn hydrate_creature(
    source: &dyn CatalogSource,
    entry: &IndexEntry,
) -> Option<CreatureRecord> {
    let detail = match source.fetch_creature(&entry.url).await {
        Ok(detail) => detail,
        Err(error) => {
            tracing::warn!(name = %entry.name, %error, "skipping creature, detail fetch failed");
            return None;
        }
    };

    let mut weaknesses = BTreeSet::new();
    for slot in &detail.types {
        match source.fetch_weaknesses(&slot.url).await {
            Ok(names) => weaknesses.extend(names),
            Err(error) => {
                tracing::warn!(
                    name = %detail.name,
                    type_name = %slot.name,
                    %error,
                    "type relations unavailable, weaknesses incomplete"
                );
            }
        }
    }

    Some(CreatureRecord {
        name: detail.name,
        id: detail.id,
        image_url: detail.image_url,
        types: detail.types,
        weaknesses,
    })
}

/// Hydrate every entry concurrently and wait for all of them.
///
/// Output keeps the order of `entries` and leaves out entries whose detail
/// fetch failed. Returns `None` if `cancel` fires first; in-flight fetches
/// are aborted.
pub async fn hydrate_batch(
    source: Arc<dyn CatalogSource>,
    entries: Vec<IndexEntry>,
    cancel: CancellationToken,
) -> Option<Vec<CreatureRecord>> {
    let total = entries.len();
    let mut join_set = JoinSet::new();
    for (position, entry) in entries.into_iter().enumerate() {
        let source = Arc::clone(&source);
        join_set.spawn(async move { (position, hydrate_creature(source.as_ref(), &entry).await) });
    }

    let mut hydrated = Vec::with_capacity(total);
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                join_set.abort_all();
                tracing::debug!(total, "hydration batch cancelled");
                return None;
            }
            next = join_set.join_next() => match next {
                Some(Ok((position, Some(record)))) => hydrated.push((position, record)),
                Some(Ok((_, None))) => {}
                Some(Err(error)) => tracing::warn!(%error, "hydration task failed"),
                None => break,
            },
        }
    }

    hydrated.sort_by_key(|(position, _)| *position);
    tracing::info!(total, hydrated = hydrated.len(), "hydration batch finished");
    Some(hydrated.into_iter().map(|(_, record)| record).collect())
}
