//! In-memory `VectorBackend` double shared by the memory tests.

use crate::error::StoreError;
use crate::memory::qdrant::{ScoredHit, StoredPoint, VectorBackend};
use crate::memory::types::{CollectionSchema, CollectionSpec, Distance, MemoryRecord};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use uuid::Uuid;

#[derive(Default)]
struct BackendState {
    collections: HashMap<String, CollectionSchema>,
    /// Points per collection in insertion order. Overwrites keep the
    /// original slot so tie-breaks stay stable under retry.
    points: HashMap<String, Vec<(Uuid, Vec<f32>, String)>>,
}

/// Test double that mimics Qdrant semantics: schema-checked upserts, ranked
/// similarity search, unranked scroll, and call counting for idempotence
/// assertions.
#[derive(Default)]
pub(crate) struct InMemoryBackend {
    state: Mutex<BackendState>,
    pub(crate) create_calls: AtomicUsize,
    pub(crate) upsert_calls: AtomicUsize,
    /// When set, the next create fails with a 409-style error. Combined with
    /// `conflict_schema`, simulates a concurrent creator winning the race.
    pub(crate) fail_next_create: AtomicBool,
    pub(crate) conflict_schema: Mutex<Option<CollectionSchema>>,
    /// When set, every network-touching call fails as unreachable.
    pub(crate) offline: AtomicBool,
}

impl InMemoryBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn point_count(&self, collection: &str) -> usize {
        self.state
            .lock()
            .points
            .get(collection)
            .map_or(0, |points| points.len())
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unreachable("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

fn similarity(metric: Distance, a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    match metric {
        Distance::Dot => dot,
        Distance::Cosine => {
            let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm_a == 0.0 || norm_b == 0.0 {
                0.0
            } else {
                dot / (norm_a * norm_b)
            }
        }
        Distance::Euclidean => {
            let distance = a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt();
            -distance
        }
    }
}

#[async_trait]
impl VectorBackend for InMemoryBackend {
    async fn get_collection(&self, name: &str) -> Result<Option<CollectionSchema>, StoreError> {
        self.check_online()?;
        Ok(self.state.lock().collections.get(name).cloned())
    }

    async fn create_collection(&self, spec: &CollectionSpec) -> Result<(), StoreError> {
        self.check_online()?;
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            if let Some(schema) = self.conflict_schema.lock().clone() {
                self.state
                    .lock()
                    .collections
                    .insert(spec.name.clone(), schema);
            }
            return Err(StoreError::BadRequest(format!(
                "409: collection {} already exists",
                spec.name
            )));
        }

        self.state.lock().collections.insert(
            spec.name.clone(),
            CollectionSchema {
                dimension: spec.dimension,
                metric: spec.metric,
            },
        );
        Ok(())
    }

    async fn upsert(&self, collection: &str, record: &MemoryRecord) -> Result<(), StoreError> {
        self.check_online()?;
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);

        let mut state = self.state.lock();
        let schema = state
            .collections
            .get(collection)
            .cloned()
            .ok_or_else(|| StoreError::BadRequest(format!("404: no collection {collection}")))?;

        if record.vector.len() != schema.dimension {
            return Err(StoreError::BadRequest(format!(
                "400: vector has {} components, collection expects {}",
                record.vector.len(),
                schema.dimension
            )));
        }

        let points = state.points.entry(collection.to_string()).or_default();
        if let Some(slot) = points.iter_mut().find(|(id, _, _)| *id == record.id) {
            slot.1 = record.vector.clone();
            slot.2 = record.text.clone();
        } else {
            points.push((record.id, record.vector.clone(), record.text.clone()));
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredHit>, StoreError> {
        self.check_online()?;
        let state = self.state.lock();
        let schema = state
            .collections
            .get(collection)
            .ok_or_else(|| StoreError::BadRequest(format!("404: no collection {collection}")))?;

        let mut hits: Vec<ScoredHit> = state
            .points
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|(_, stored, text)| ScoredHit {
                text: text.clone(),
                score: similarity(schema.metric, vector, stored),
            })
            .collect();

        // Stable sort: equal scores keep insertion order.
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn scroll(&self, collection: &str, limit: usize) -> Result<Vec<StoredPoint>, StoreError> {
        self.check_online()?;
        let state = self.state.lock();
        Ok(state
            .points
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .take(limit)
            .map(|(_, _, text)| StoredPoint { text: text.clone() })
            .collect())
    }
}
