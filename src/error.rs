//! Top-level error types for Billy.

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error enum wrapping domain-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    Provision(#[from] ProvisionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Embedding backend errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("embedding backend unavailable: {0}")]
    Unavailable(String),

    #[error("embedding backend returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Collection provisioning errors.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    #[error("failed to create collection {name}: {reason}")]
    CreateFailed { name: String, reason: String },

    #[error(
        "collection {name} exists with dimension {found_dimension} and metric \
         {found_metric}, expected dimension {expected_dimension} and metric {expected_metric}"
    )]
    SchemaMismatch {
        name: String,
        expected_dimension: usize,
        expected_metric: String,
        found_dimension: usize,
        found_metric: String,
    },

    #[error("vector store unreachable during provisioning: {0}")]
    Unreachable(String),
}

/// Vector store read/write errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("vector store unreachable: {0}")]
    Unreachable(String),

    #[error("vector store rejected the request: {0}")]
    BadRequest(String),

    #[error("collection has not been provisioned")]
    NotProvisioned,
}

/// Errors surfaced by `MemoryService::save`.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("invalid memory text: {0}")]
    InvalidText(String),

    #[error("failed to embed memory: {0}")]
    Embed(#[from] EmbedError),

    #[error("failed to provision collection: {0}")]
    Provision(#[from] ProvisionError),

    #[error("failed to write memory: {0}")]
    Store(#[from] StoreError),
}

impl SaveError {
    /// Whether the caller may retry the same request unchanged.
    ///
    /// Dependency outages are retryable; bad input and schema mismatches
    /// require the request or the deployment to change first.
    pub fn is_retryable(&self) -> bool {
        match self {
            SaveError::InvalidText(_) => false,
            SaveError::Embed(EmbedError::Unavailable(_)) => true,
            SaveError::Embed(EmbedError::InvalidResponse(_)) => false,
            SaveError::Provision(ProvisionError::SchemaMismatch { .. }) => false,
            SaveError::Provision(_) => true,
            SaveError::Store(StoreError::BadRequest(_)) => false,
            SaveError::Store(_) => true,
        }
    }
}

/// Errors surfaced by `MemoryService::search`.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("invalid search query: {0}")]
    InvalidQuery(String),

    #[error("failed to embed query: {0}")]
    Embed(#[from] EmbedError),

    #[error("failed to provision collection: {0}")]
    Provision(#[from] ProvisionError),

    #[error("failed to query memories: {0}")]
    Store(#[from] StoreError),
}

impl SearchError {
    /// Whether the caller may retry the same request unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            SearchError::InvalidQuery(_) => false,
            SearchError::Embed(EmbedError::Unavailable(_)) => true,
            SearchError::Embed(EmbedError::InvalidResponse(_)) => false,
            SearchError::Provision(ProvisionError::SchemaMismatch { .. }) => false,
            SearchError::Provision(_) => true,
            SearchError::Store(StoreError::BadRequest(_)) => false,
            SearchError::Store(_) => true,
        }
    }
}

/// Chat completion errors.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("chat backend unavailable: {0}")]
    Unavailable(String),

    #[error("chat backend returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// User profile persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("failed to read profile from {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to write profile to {path}: {reason}")]
    Write { path: String, reason: String },
}
