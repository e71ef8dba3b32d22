//! Billy: a personal-assistant backend with a semantic memory store.
//!
//! Memories are embedded into vectors and persisted in Qdrant; retrieval is
//! either vector similarity search or a substring scan over recent records,
//! chosen once by configuration.

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod memory;
pub mod profile;

pub use error::{Error, Result};

use crate::api::ApiState;
use crate::config::{Config, EmbeddingBackend};
use crate::llm::ChatClient;
use crate::memory::{
    EmbeddingProvider, HashEmbedder, MemoryService, MemoryStoreClient, OllamaEmbedder, QdrantHttp,
};
use crate::profile::ProfileStore;
use anyhow::Context as _;
use std::sync::Arc;

/// Wire the full dependency graph from configuration.
///
/// Every collaborator is constructor-injected from here down; nothing holds
/// a process-global client handle.
pub fn build_api_state(config: &Config) -> Result<Arc<ApiState>> {
    let http = reqwest::Client::builder()
        .build()
        .with_context(|| "failed to build HTTP client")?;

    let backend = Arc::new(QdrantHttp::new(http.clone(), config.qdrant_url.clone()));
    let store = Arc::new(MemoryStoreClient::new(
        backend,
        config.collection_spec(),
        config.scan_window,
    ));

    let embedder: Arc<dyn EmbeddingProvider> = match config.embedding_backend {
        EmbeddingBackend::Ollama => Arc::new(OllamaEmbedder::new(
            http.clone(),
            config.ollama_url.clone(),
            config.embedding_model.clone(),
            config.vector_size,
        )),
        EmbeddingBackend::Hash => {
            tracing::warn!(
                "using the hash embedder: vectors are deterministic but not semantic"
            );
            Arc::new(HashEmbedder::new(config.vector_size))
        }
    };

    let memory = Arc::new(MemoryService::new(
        store,
        embedder,
        config.retrieval_mode,
        config.max_text_len,
    ));

    let chat = Arc::new(ChatClient::new(
        http,
        config.ollama_url.clone(),
        config.chat_model.clone(),
        config.assistant_name.clone(),
    ));

    let profiles = Arc::new(ProfileStore::new(config.profile_path.clone()));

    Ok(Arc::new(ApiState {
        memory,
        chat,
        profiles,
    }))
}
