//! Configuration loading and validation.

use crate::error::{ConfigError, Result};
use crate::memory::{Distance, RetrievalMode};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Which embedding strategy to construct at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingBackend {
    /// Call the configured Ollama embedding model.
    Ollama,
    /// Deterministic hash-based vectors; offline/test use only.
    Hash,
}

impl std::str::FromStr for EmbeddingBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ollama" => Ok(EmbeddingBackend::Ollama),
            "hash" => Ok(EmbeddingBackend::Hash),
            other => Err(format!("unknown embedding provider: {other}")),
        }
    }
}

/// Billy configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP front door listens on.
    pub bind_addr: SocketAddr,

    /// Base URL of the Qdrant REST API.
    pub qdrant_url: String,

    /// Base URL of the Ollama API (embeddings and chat).
    pub ollama_url: String,

    /// Name of the vector collection holding memories.
    pub collection_name: String,

    /// Embedding model name passed to Ollama.
    pub embedding_model: String,

    /// Chat model name passed to Ollama.
    pub chat_model: String,

    /// Declared dimensionality of the collection.
    pub vector_size: usize,

    /// Declared distance metric of the collection.
    pub vector_distance: Distance,

    /// Embedding strategy.
    pub embedding_backend: EmbeddingBackend,

    /// Search strategy. Fixed for the process lifetime.
    pub retrieval_mode: RetrievalMode,

    /// Maximum memory text length in characters; absent means unbounded.
    pub max_text_len: Option<usize>,

    /// Retrieval window for substring scans.
    pub scan_window: usize,

    /// Path of the user profile JSON file.
    pub profile_path: PathBuf,

    /// Display name of the assistant persona.
    pub assistant_name: String,
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn load() -> Result<Self> {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup. Split out so tests don't
    /// have to mutate process-global environment state.
    pub fn load_from(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = parse_or(&var, "BIND_ADDR", "0.0.0.0:5000")?;
        let qdrant_url = var("QDRANT_URL").unwrap_or_else(|| "http://qdrant:6333".into());
        let ollama_url = var("OLLAMA_URL").unwrap_or_else(|| "http://ollama:11434".into());
        let collection_name = var("COLLECTION_NAME").unwrap_or_else(|| "billy_memories".into());
        let embedding_model = var("EMBEDDING_MODEL").unwrap_or_else(|| "nomic-embed-text".into());
        let chat_model = var("CHAT_MODEL").unwrap_or_else(|| "llama3".into());
        let vector_size: usize = parse_or(&var, "VECTOR_SIZE", "768")?;
        let vector_distance = parse_or(&var, "VECTOR_DISTANCE", "Cosine")?;
        let embedding_backend = parse_or(&var, "EMBEDDING_PROVIDER", "ollama")?;
        let retrieval_mode = parse_or(&var, "MEMORY_RETRIEVAL_MODE", "vector")?;
        let max_text_len = parse_optional(&var, "MEMORY_MAX_TEXT_LEN")?;
        let scan_window: usize = parse_or(&var, "SCAN_WINDOW", "50")?;
        let profile_path =
            PathBuf::from(var("PROFILE_PATH").unwrap_or_else(|| "data/user_profile.json".into()));
        let assistant_name = var("ASSISTANT_NAME").unwrap_or_else(|| "Billy".into());

        if vector_size == 0 {
            return Err(ConfigError::Invalid("VECTOR_SIZE must be positive".into()).into());
        }
        if scan_window == 0 {
            return Err(ConfigError::Invalid("SCAN_WINDOW must be positive".into()).into());
        }

        Ok(Self {
            bind_addr,
            qdrant_url,
            ollama_url,
            collection_name,
            embedding_model,
            chat_model,
            vector_size,
            vector_distance,
            embedding_backend,
            retrieval_mode,
            max_text_len,
            scan_window,
            profile_path,
            assistant_name,
        })
    }

    /// The collection spec implied by this configuration.
    pub fn collection_spec(&self) -> crate::memory::CollectionSpec {
        crate::memory::CollectionSpec::new(
            self.collection_name.clone(),
            self.vector_size,
            self.vector_distance,
        )
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = var(key).unwrap_or_else(|| default.to_string());
    raw.parse().map_err(|_| {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }
        .into()
    })
}

fn parse_optional<T, F>(var: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| {
                ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw,
                }
                .into()
            }),
    }
}
