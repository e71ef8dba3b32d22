//! Collection provisioning: lazily create the vector collection, refuse to
//! touch one whose schema disagrees with ours.

use crate::error::{ProvisionError, StoreError};
use crate::memory::qdrant::VectorBackend;
use crate::memory::types::{CollectionSchema, CollectionSpec};
use std::sync::Arc;

/// Ensures a named collection exists with the declared dimension and metric
/// before any read or write.
pub struct CollectionProvisioner {
    backend: Arc<dyn VectorBackend>,
}

impl CollectionProvisioner {
    pub fn new(backend: Arc<dyn VectorBackend>) -> Self {
        Self { backend }
    }

    /// Idempotently ensure the collection exists with `spec`'s schema.
    ///
    /// An existing collection with a different dimension or metric is a
    /// `SchemaMismatch` — operator intervention, never a drop-and-recreate.
    /// A lost creation race counts as success when the winner's schema
    /// matches ours.
    pub async fn ensure_collection(&self, spec: &CollectionSpec) -> Result<(), ProvisionError> {
        match self.fetch_schema(&spec.name).await? {
            Some(schema) => check_schema(spec, &schema),
            None => self.create(spec).await,
        }
    }

    async fn fetch_schema(&self, name: &str) -> Result<Option<CollectionSchema>, ProvisionError> {
        self.backend
            .get_collection(name)
            .await
            .map_err(provision_transport_error)
    }

    async fn create(&self, spec: &CollectionSpec) -> Result<(), ProvisionError> {
        match self.backend.create_collection(spec).await {
            Ok(()) => {
                tracing::info!(
                    collection = %spec.name,
                    dimension = spec.dimension,
                    metric = %spec.metric,
                    "created vector collection"
                );
                Ok(())
            }
            Err(create_error) => {
                // A concurrent creator may have won the race between our
                // existence check and the create call. Re-fetch and accept
                // the outcome when the schema matches.
                match self.fetch_schema(&spec.name).await {
                    Ok(Some(schema)) => check_schema(spec, &schema),
                    _ => Err(ProvisionError::CreateFailed {
                        name: spec.name.clone(),
                        reason: create_error.to_string(),
                    }),
                }
            }
        }
    }
}

fn check_schema(spec: &CollectionSpec, found: &CollectionSchema) -> Result<(), ProvisionError> {
    if found.dimension == spec.dimension && found.metric == spec.metric {
        Ok(())
    } else {
        Err(ProvisionError::SchemaMismatch {
            name: spec.name.clone(),
            expected_dimension: spec.dimension,
            expected_metric: spec.metric.to_string(),
            found_dimension: found.dimension,
            found_metric: found.metric.to_string(),
        })
    }
}

fn provision_transport_error(error: StoreError) -> ProvisionError {
    ProvisionError::Unreachable(error.to_string())
}
