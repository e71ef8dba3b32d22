//! Qdrant REST transport.
//!
//! Speaks Qdrant's HTTP API directly. Everything above this layer goes
//! through the [`VectorBackend`] trait so tests can substitute an in-memory
//! double for the real store.

use crate::error::StoreError;
use crate::memory::types::{CollectionSchema, CollectionSpec, Distance, MemoryRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout for point reads and writes.
const STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for collection existence checks and creation. Shorter than point
/// operations since these run on every save/search.
const PROVISION_TIMEOUT: Duration = Duration::from_secs(5);

/// One vector-search hit as returned by the backend, ranked best-first.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHit {
    pub text: String,
    pub score: f32,
}

/// One scrolled point, unranked.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPoint {
    pub text: String,
}

/// Transport to a vector store. The production implementation is
/// [`QdrantHttp`]; tests inject an in-memory double.
#[async_trait]
pub trait VectorBackend: Send + Sync {
    /// Fetch the schema of an existing collection, or `None` if it does not
    /// exist.
    async fn get_collection(&self, name: &str) -> Result<Option<CollectionSchema>, StoreError>;

    /// Create a collection with the given schema.
    async fn create_collection(&self, spec: &CollectionSpec) -> Result<(), StoreError>;

    /// Write one record. Duplicate ids overwrite.
    async fn upsert(&self, collection: &str, record: &MemoryRecord) -> Result<(), StoreError>;

    /// Return up to `limit` hits ranked by descending similarity under the
    /// collection's metric.
    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredHit>, StoreError>;

    /// Return up to `limit` points in store-default order, unranked.
    async fn scroll(&self, collection: &str, limit: usize) -> Result<Vec<StoredPoint>, StoreError>;
}

/// Qdrant REST client.
pub struct QdrantHttp {
    http: reqwest::Client,
    base_url: String,
}

impl QdrantHttp {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Map a non-success response to the store error taxonomy: client errors
    /// are `BadRequest` (dimension mismatch on write and the like), anything
    /// else is `Unreachable`.
    async fn reject(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            StoreError::BadRequest(format!("{status}: {body}"))
        } else {
            StoreError::Unreachable(format!("{status}: {body}"))
        }
    }
}

// -- Wire types --

#[derive(Deserialize)]
struct GetCollectionResponse {
    result: CollectionResult,
}

#[derive(Deserialize)]
struct CollectionResult {
    config: CollectionConfig,
}

#[derive(Deserialize)]
struct CollectionConfig {
    params: CollectionParams,
}

#[derive(Deserialize)]
struct CollectionParams {
    vectors: VectorParams,
}

#[derive(Serialize, Deserialize)]
struct VectorParams {
    size: usize,
    distance: Distance,
}

#[derive(Serialize)]
struct CreateCollectionRequest {
    vectors: VectorParams,
}

#[derive(Serialize)]
struct UpsertPointsRequest {
    points: Vec<PointStruct>,
}

#[derive(Serialize)]
struct PointStruct {
    id: uuid::Uuid,
    vector: Vec<f32>,
    payload: PointPayload,
}

#[derive(Serialize)]
struct PointPayload {
    text: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize)]
struct SearchPointsRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct SearchPointsResponse {
    result: Vec<ScoredPointWire>,
}

#[derive(Deserialize)]
struct ScoredPointWire {
    score: f32,
    payload: Option<ScrollPayload>,
}

#[derive(Serialize)]
struct ScrollPointsRequest {
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct ScrollPointsResponse {
    result: ScrollResult,
}

#[derive(Deserialize)]
struct ScrollResult {
    points: Vec<ScrolledPointWire>,
}

#[derive(Deserialize)]
struct ScrolledPointWire {
    payload: Option<ScrollPayload>,
}

/// Payload as read back from the store. Points written by other tools may
/// lack a `text` field; those are dropped from results.
#[derive(Deserialize)]
struct ScrollPayload {
    text: Option<String>,
}

fn parse_search_hits(response: SearchPointsResponse) -> Vec<ScoredHit> {
    response
        .result
        .into_iter()
        .filter_map(|point| {
            let text = point.payload.and_then(|p| p.text)?;
            Some(ScoredHit {
                text,
                score: point.score,
            })
        })
        .collect()
}

fn parse_scrolled_points(response: ScrollPointsResponse) -> Vec<StoredPoint> {
    response
        .result
        .points
        .into_iter()
        .filter_map(|point| {
            let text = point.payload.and_then(|p| p.text)?;
            Some(StoredPoint { text })
        })
        .collect()
}

#[async_trait]
impl VectorBackend for QdrantHttp {
    async fn get_collection(&self, name: &str) -> Result<Option<CollectionSchema>, StoreError> {
        let url = format!("{}/collections/{}", self.base_url, name);
        let response = self
            .http
            .get(&url)
            .timeout(PROVISION_TIMEOUT)
            .send()
            .await
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        let body: GetCollectionResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Unreachable(format!("malformed collection info: {e}")))?;

        let vectors = body.result.config.params.vectors;
        Ok(Some(CollectionSchema {
            dimension: vectors.size,
            metric: vectors.distance,
        }))
    }

    async fn create_collection(&self, spec: &CollectionSpec) -> Result<(), StoreError> {
        let url = format!("{}/collections/{}", self.base_url, spec.name);
        let response = self
            .http
            .put(&url)
            .timeout(PROVISION_TIMEOUT)
            .json(&CreateCollectionRequest {
                vectors: VectorParams {
                    size: spec.dimension,
                    distance: spec.metric,
                },
            })
            .send()
            .await
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Ok(())
    }

    async fn upsert(&self, collection: &str, record: &MemoryRecord) -> Result<(), StoreError> {
        let url = format!("{}/collections/{}/points", self.base_url, collection);
        let response = self
            .http
            .put(&url)
            .timeout(STORE_TIMEOUT)
            .json(&UpsertPointsRequest {
                points: vec![PointStruct {
                    id: record.id,
                    vector: record.vector.clone(),
                    payload: PointPayload {
                        text: record.text.clone(),
                        created_at: record.created_at,
                    },
                }],
            })
            .send()
            .await
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredHit>, StoreError> {
        let url = format!("{}/collections/{}/points/search", self.base_url, collection);
        let response = self
            .http
            .post(&url)
            .timeout(STORE_TIMEOUT)
            .json(&SearchPointsRequest {
                vector,
                limit,
                with_payload: true,
            })
            .send()
            .await
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        let body: SearchPointsResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Unreachable(format!("malformed search response: {e}")))?;

        Ok(parse_search_hits(body))
    }

    async fn scroll(&self, collection: &str, limit: usize) -> Result<Vec<StoredPoint>, StoreError> {
        let url = format!("{}/collections/{}/points/scroll", self.base_url, collection);
        let response = self
            .http
            .post(&url)
            .timeout(STORE_TIMEOUT)
            .json(&ScrollPointsRequest {
                limit,
                with_payload: true,
            })
            .send()
            .await
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::reject(response).await);
        }

        let body: ScrollPointsResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Unreachable(format!("malformed scroll response: {e}")))?;

        Ok(parse_scrolled_points(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn parses_collection_info() {
        let raw = indoc! {r#"
            {
              "result": {
                "status": "green",
                "config": {
                  "params": {
                    "vectors": { "size": 768, "distance": "Cosine" }
                  }
                }
              },
              "status": "ok",
              "time": 0.000123
            }
        "#};
        let body: GetCollectionResponse = serde_json::from_str(raw).unwrap();
        let vectors = body.result.config.params.vectors;
        assert_eq!(vectors.size, 768);
        assert_eq!(vectors.distance, Distance::Cosine);
    }

    #[test]
    fn parses_search_response_and_drops_payloadless_hits() {
        let raw = indoc! {r#"
            {
              "result": [
                { "id": "a", "score": 0.92, "payload": { "text": "chad is my name" } },
                { "id": "b", "score": 0.40, "payload": null },
                { "id": "c", "score": 0.31, "payload": { "text": "likes coffee" } }
              ],
              "status": "ok"
            }
        "#};
        let body: SearchPointsResponse = serde_json::from_str(raw).unwrap();
        let hits = parse_search_hits(body);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].text, "chad is my name");
        assert_eq!(hits[0].score, 0.92);
    }

    #[test]
    fn parses_scroll_response() {
        let raw = indoc! {r#"
            {
              "result": {
                "points": [
                  { "id": 1, "payload": { "text": "first" } },
                  { "id": 2, "payload": { "text": "second" } }
                ],
                "next_page_offset": null
              },
              "status": "ok"
            }
        "#};
        let body: ScrollPointsResponse = serde_json::from_str(raw).unwrap();
        let points = parse_scrolled_points(body);
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].text, "second");
    }

    #[test]
    fn create_request_uses_qdrant_vector_params() {
        let request = CreateCollectionRequest {
            vectors: VectorParams {
                size: 64,
                distance: Distance::Euclidean,
            },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["vectors"]["size"], 64);
        assert_eq!(json["vectors"]["distance"], "Euclid");
    }
}
