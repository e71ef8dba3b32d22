//! The public save/search contract consumed by the HTTP layer.

use crate::error::{SaveError, SearchError};
use crate::memory::embedding::EmbeddingProvider;
use crate::memory::store::MemoryStoreClient;
use crate::memory::types::{MemoryRecord, RetrievalMode, SearchResult};
use std::sync::Arc;

/// Default number of results when the caller does not ask for a limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Coordinates provisioning, embedding, and the store client behind one
/// save/search surface.
///
/// The retrieval mode is fixed at construction: either every search embeds
/// the query and ranks by similarity, or every search is a substring scan.
/// The two are never mixed per request.
pub struct MemoryService {
    store: Arc<MemoryStoreClient>,
    embedder: Arc<dyn EmbeddingProvider>,
    mode: RetrievalMode,
    /// Maximum accepted text length in characters. `None` means unbounded.
    max_text_len: Option<usize>,
}

impl MemoryService {
    pub fn new(
        store: Arc<MemoryStoreClient>,
        embedder: Arc<dyn EmbeddingProvider>,
        mode: RetrievalMode,
        max_text_len: Option<usize>,
    ) -> Self {
        Self {
            store,
            embedder,
            mode,
            max_text_len,
        }
    }

    pub fn mode(&self) -> RetrievalMode {
        self.mode
    }

    pub fn store(&self) -> &Arc<MemoryStoreClient> {
        &self.store
    }

    /// Persist one memory.
    ///
    /// Fails closed: when embedding fails, nothing is written. A memory is
    /// never stored with a placeholder vector.
    pub async fn save(&self, text: &str) -> Result<(), SaveError> {
        if text.trim().is_empty() {
            return Err(SaveError::InvalidText("text must not be empty".into()));
        }
        if let Some(max) = self.max_text_len {
            let length = text.chars().count();
            if length > max {
                return Err(SaveError::InvalidText(format!(
                    "text is {length} characters, limit is {max}"
                )));
            }
        }

        self.store.provision().await?;
        let vector = self.embedder.embed(text).await?;
        let record = MemoryRecord::new(text, vector);

        self.store.upsert(&record).await?;
        tracing::debug!(memory_id = %record.id, "memory saved");
        Ok(())
    }

    /// Retrieve the memories most relevant to `query`, best match first.
    ///
    /// `limit` defaults to [`DEFAULT_SEARCH_LIMIT`]; zero returns an empty
    /// list. Scan mode never touches the embedding backend.
    pub async fn search(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::InvalidQuery("query must not be empty".into()));
        }
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);

        self.store.provision().await?;

        let results = match self.mode {
            RetrievalMode::Vector => {
                let vector = self.embedder.embed(query).await?;
                self.store.vector_search(&vector, limit).await?
            }
            RetrievalMode::Scan => self.store.scan_search(query, limit).await?,
        };

        tracing::debug!(mode = ?self.mode, hits = results.len(), "memory search");
        Ok(results)
    }
}
