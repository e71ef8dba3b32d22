//! Memory record and collection types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single stored memory: the original text plus its embedding vector.
///
/// Records are immutable once written. The id must be globally unique within
/// the collection; `new` assigns a fresh UUID v4.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryRecord {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub text: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl MemoryRecord {
    /// Create a new record with a fresh id and the current timestamp.
    pub fn new(text: impl Into<String>, vector: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vector,
            text: text.into(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Distance metric for a vector collection.
///
/// Serialized with Qdrant's wire names (`Euclid` for euclidean distance).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Distance {
    Cosine,
    Dot,
    #[serde(rename = "Euclid")]
    Euclidean,
}

impl std::fmt::Display for Distance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Distance::Cosine => write!(f, "Cosine"),
            Distance::Dot => write!(f, "Dot"),
            Distance::Euclidean => write!(f, "Euclid"),
        }
    }
}

impl std::str::FromStr for Distance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cosine" => Ok(Distance::Cosine),
            "dot" => Ok(Distance::Dot),
            "euclid" | "euclidean" => Ok(Distance::Euclidean),
            other => Err(format!("unknown distance metric: {other}")),
        }
    }
}

/// Declared schema of a vector collection. Immutable once created; a
/// mismatched re-declaration against an existing collection is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: String,
    pub dimension: usize,
    pub metric: Distance,
}

impl CollectionSpec {
    pub fn new(name: impl Into<String>, dimension: usize, metric: Distance) -> Self {
        Self {
            name: name.into(),
            dimension,
            metric,
        }
    }
}

/// Schema reported by the store for an existing collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSchema {
    pub dimension: usize,
    pub metric: Distance,
}

/// One search hit. `score` is present only for vector search; the substring
/// scan offers no relevance ranking beyond containment.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResult {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

/// How `MemoryService::search` retrieves memories. Chosen once by
/// configuration, never switched per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalMode {
    /// Embed the query and rank by vector similarity.
    Vector,
    /// Case-insensitive substring scan over a recent window. Degraded
    /// fallback for deployments without an embedding backend.
    Scan,
}

impl std::str::FromStr for RetrievalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vector" => Ok(RetrievalMode::Vector),
            "scan" => Ok(RetrievalMode::Scan),
            other => Err(format!("unknown retrieval mode: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_serializes_with_qdrant_wire_names() {
        assert_eq!(serde_json::to_string(&Distance::Cosine).unwrap(), "\"Cosine\"");
        assert_eq!(serde_json::to_string(&Distance::Euclidean).unwrap(), "\"Euclid\"");
    }

    #[test]
    fn distance_parses_both_spellings_of_euclidean() {
        assert_eq!("euclidean".parse::<Distance>().unwrap(), Distance::Euclidean);
        assert_eq!("Euclid".parse::<Distance>().unwrap(), Distance::Euclidean);
    }

    #[test]
    fn scan_results_omit_score_in_json() {
        let result = SearchResult {
            text: "chad is my name".into(),
            score: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("score").is_none());
    }

    #[test]
    fn new_records_get_unique_ids() {
        let a = MemoryRecord::new("one", vec![0.0; 4]);
        let b = MemoryRecord::new("one", vec![0.0; 4]);
        assert_ne!(a.id, b.id);
    }
}
