//! Maps change operations to index writes.
//!
//! Per-record state machine: decode the relevant row image, resolve the
//! tenant's destination, gate on cluster health, then perform the one
//! write the operation calls for. Failures come back as values; the
//! coordinator tallies them without aborting the batch.

use projector_core::document::{identifier, tenant, ProductDocument};
use projector_core::prelude::*;
use tracing::{debug, warn};

use crate::endpoints::{EndpointRegistry, DEFAULT_TENANT};
use crate::es_client::EsClient;
use crate::health::ClusterHealthProbe;

/// What the dispatcher did with a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Insert projected and written with a full-document put
    Indexed,
    /// Modify projected and written as an upsert update
    Updated,
    /// Remove translated to a delete by identifier
    Deleted,
    /// Unrecognized operation, skipped without failure
    Ignored,
}

pub struct ChangeDispatcher {
    registry: EndpointRegistry,
    probe: ClusterHealthProbe,
    client: EsClient,
}

impl ChangeDispatcher {
    pub fn new(registry: EndpointRegistry, probe: ClusterHealthProbe, client: EsClient) -> Self {
        Self {
            registry,
            probe,
            client,
        }
    }

    /// Process one change record
    pub async fn dispatch(&self, record: &ChangeRecord) -> Result<DispatchOutcome> {
        match record.operation {
            StreamOperation::Insert => {
                let row = decode_row(record.require_after_image()?);
                let doc = ProductDocument::from_row(&row)?;
                let endpoint = self.admit(&doc.tenant_id).await?;
                self.client.put_document(endpoint, &doc).await?;
                debug!(doc_id = %doc.codigo, endpoint, "Record indexed");
                Ok(DispatchOutcome::Indexed)
            }
            StreamOperation::Modify => {
                let row = decode_row(record.require_after_image()?);
                let doc = ProductDocument::from_row(&row)?;
                let endpoint = self.admit(&doc.tenant_id).await?;
                self.client.update_document(endpoint, &doc).await?;
                debug!(doc_id = %doc.codigo, endpoint, "Record upserted");
                Ok(DispatchOutcome::Updated)
            }
            StreamOperation::Remove => {
                let row = decode_row(record.require_before_image()?);
                let doc_id = identifier(&row)?;
                let endpoint = self.admit(&tenant(&row)).await?;
                self.client.delete_document(endpoint, &doc_id).await?;
                debug!(doc_id = %doc_id, endpoint, "Record deleted");
                Ok(DispatchOutcome::Deleted)
            }
            StreamOperation::Unknown => {
                warn!("Unrecognized operation, skipping record");
                Ok(DispatchOutcome::Ignored)
            }
        }
    }

    /// Resolve the tenant's destination and gate on cluster health.
    ///
    /// A record whose row carries no tenant uses the `default` mapping.
    async fn admit(&self, tenant_id: &str) -> Result<&str> {
        let tenant_id = if tenant_id.is_empty() {
            DEFAULT_TENANT
        } else {
            tenant_id
        };

        let endpoint = self
            .registry
            .resolve(tenant_id)
            .ok_or_else(|| ProjectorError::endpoint_not_found(tenant_id))?;

        if !self.probe.is_healthy(endpoint).await {
            return Err(ProjectorError::unhealthy(endpoint));
        }

        Ok(endpoint)
    }
}
