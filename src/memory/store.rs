//! Memory store client: provision-gated reads and writes against the
//! vector backend.

use crate::error::{ProvisionError, StoreError};
use crate::memory::provision::CollectionProvisioner;
use crate::memory::qdrant::VectorBackend;
use crate::memory::types::{CollectionSpec, MemoryRecord, SearchResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Writes memory records and retrieves them by vector similarity or by
/// substring scan. Every operation requires a prior successful
/// [`provision`](MemoryStoreClient::provision) so a restarted store is
/// re-checked instead of silently written to.
pub struct MemoryStoreClient {
    backend: Arc<dyn VectorBackend>,
    provisioner: CollectionProvisioner,
    spec: CollectionSpec,
    /// Retrieval window for substring scans.
    scan_window: usize,
    provisioned: AtomicBool,
}

impl MemoryStoreClient {
    pub fn new(backend: Arc<dyn VectorBackend>, spec: CollectionSpec, scan_window: usize) -> Self {
        let provisioner = CollectionProvisioner::new(backend.clone());
        Self {
            backend,
            provisioner,
            spec,
            scan_window,
            provisioned: AtomicBool::new(false),
        }
    }

    pub fn spec(&self) -> &CollectionSpec {
        &self.spec
    }

    /// Re-ensure the collection exists with our schema. Callers run this
    /// before every save/search; the result is not cached across failures.
    pub async fn provision(&self) -> Result<(), ProvisionError> {
        match self.provisioner.ensure_collection(&self.spec).await {
            Ok(()) => {
                self.provisioned.store(true, Ordering::SeqCst);
                Ok(())
            }
            Err(error) => {
                self.provisioned.store(false, Ordering::SeqCst);
                Err(error)
            }
        }
    }

    fn require_provisioned(&self) -> Result<(), StoreError> {
        if self.provisioned.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::NotProvisioned)
        }
    }

    /// Write one record. At-least-once: a retried duplicate id overwrites
    /// the stored point, which is not an error.
    pub async fn upsert(&self, record: &MemoryRecord) -> Result<(), StoreError> {
        self.require_provisioned()?;

        // Reject mismatched vectors locally so a record is never silently
        // truncated or padded on its way to the store.
        if record.vector.len() != self.spec.dimension {
            return Err(StoreError::BadRequest(format!(
                "vector has {} components, collection {} expects {}",
                record.vector.len(),
                self.spec.name,
                self.spec.dimension
            )));
        }

        self.backend.upsert(&self.spec.name, record).await
    }

    /// Up to `limit` results ranked by descending similarity under the
    /// collection's metric. Equal scores keep the backend's order (stable
    /// sort), so earlier-inserted records win ties.
    pub async fn vector_search(
        &self,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>, StoreError> {
        self.require_provisioned()?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut hits = self.backend.search(&self.spec.name, vector, limit).await?;
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(limit);

        Ok(hits
            .into_iter()
            .map(|hit| SearchResult {
                text: hit.text,
                score: Some(hit.score),
            })
            .collect())
    }

    /// Case-insensitive substring containment over a fixed window of
    /// recently stored records. No relevance ranking; scores are absent.
    pub async fn scan_search(
        &self,
        needle: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, StoreError> {
        self.require_provisioned()?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let needle = needle.to_lowercase();
        let points = self.backend.scroll(&self.spec.name, self.scan_window).await?;

        Ok(points
            .into_iter()
            .filter(|point| point.text.to_lowercase().contains(&needle))
            .take(limit)
            .map(|point| SearchResult {
                text: point.text,
                score: None,
            })
            .collect())
    }
}
