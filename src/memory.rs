//! Semantic memory: embedding, provisioning, storage, and retrieval.

pub mod embedding;
pub mod provision;
pub mod qdrant;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use embedding::{EmbeddingProvider, HashEmbedder, OllamaEmbedder};
pub use provision::CollectionProvisioner;
pub use qdrant::{QdrantHttp, VectorBackend};
pub use service::{DEFAULT_SEARCH_LIMIT, MemoryService};
pub use store::MemoryStoreClient;
pub use types::{CollectionSpec, Distance, MemoryRecord, RetrievalMode, SearchResult};
