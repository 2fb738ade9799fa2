//! Elasticsearch index client.
//!
//! Three idempotent write operations against a per-record destination:
//! create-or-replace, partial update with upsert, and delete. All three
//! ride a shared transport with bounded retry on transient failures;
//! non-retryable rejections surface immediately with status and body.

use projector_core::metrics::ProjectorMetrics;
use projector_core::prelude::*;
use projector_core::ElasticsearchConfig;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::json;
use tracing::{debug, error};

use crate::retry::RetryPolicy;

/// Client for the per-tenant destination clusters
pub struct EsClient {
    client: Client,
    config: ElasticsearchConfig,
    retry: RetryPolicy,
    metrics: ProjectorMetrics,
}

impl EsClient {
    pub fn new(config: &ElasticsearchConfig, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ProjectorError::transport_with_source("Failed to create client", e))?;

        Ok(Self {
            client,
            config: config.clone(),
            retry,
            metrics: ProjectorMetrics::new("index_client"),
        })
    }

    /// Shared transport handle, reused by the health probe
    pub fn http_client(&self) -> Client {
        self.client.clone()
    }

    /// Build a request with authentication headers
    fn build_request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut req = self.client.request(method, url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("ApiKey {}", api_key));
        } else if let (Some(ref user), Some(ref pass)) =
            (&self.config.username, &self.config.password)
        {
            req = req.basic_auth(user, Some(pass));
        }

        req
    }

    /// Create or replace the full document. Success on 200/201.
    pub async fn put_document(&self, base: &str, doc: &ProductDocument) -> Result<()> {
        let url = format!("{}/{}/_doc/{}", base, self.config.index, doc.codigo);
        let req = self.build_request(Method::PUT, &url).json(doc);
        let resp = self.send_with_retry(req, "index").await?;
        self.expect_write_success(resp, "index", &doc.codigo).await
    }

    /// Partial update with `doc_as_upsert`, so a redelivered or reordered
    /// Modify for an absent document creates it instead of failing.
    /// Success on 200/201.
    pub async fn update_document(&self, base: &str, doc: &ProductDocument) -> Result<()> {
        let url = format!("{}/{}/_update/{}", base, self.config.index, doc.codigo);
        let body = json!({ "doc": doc, "doc_as_upsert": true });
        let req = self.build_request(Method::POST, &url).json(&body);
        let resp = self.send_with_retry(req, "update").await?;
        self.expect_write_success(resp, "update", &doc.codigo).await
    }

    /// Delete by identifier. 404 means already absent and counts as
    /// success, making delete idempotent under redelivery.
    pub async fn delete_document(&self, base: &str, doc_id: &str) -> Result<()> {
        let url = format!("{}/{}/_doc/{}", base, self.config.index, doc_id);
        let req = self.build_request(Method::DELETE, &url);
        let resp = self.send_with_retry(req, "delete").await?;

        match resp.status() {
            status if status.is_success() => {
                debug!(doc_id, "Document deleted");
                Ok(())
            }
            StatusCode::NOT_FOUND => {
                debug!(doc_id, "Document already absent");
                Ok(())
            }
            status => {
                let body = resp.text().await.unwrap_or_default();
                error!(doc_id, status = status.as_u16(), body, "Delete rejected");
                Err(ProjectorError::write_rejected(status.as_u16(), body))
            }
        }
    }

    async fn expect_write_success(
        &self,
        resp: Response,
        op: &'static str,
        doc_id: &str,
    ) -> Result<()> {
        let status = resp.status();
        if status.is_success() {
            debug!(op, doc_id, status = status.as_u16(), "Write acknowledged");
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        error!(op, doc_id, status = status.as_u16(), body, "Write rejected");
        Err(ProjectorError::write_rejected(status.as_u16(), body))
    }

    /// Send a request, retrying transient statuses and connection errors
    /// within the policy's budget. Returns the final response for the
    /// caller to interpret; 2xx short-circuits out of the loop.
    async fn send_with_retry(&self, req: RequestBuilder, op: &'static str) -> Result<Response> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let request = req
                .try_clone()
                .ok_or_else(|| ProjectorError::transport("request cannot be retried"))?;

            match request.send().await {
                Ok(resp) if resp.status().is_success() => return Ok(resp),
                Ok(resp) if RetryPolicy::is_retryable_status(resp.status()) => {
                    let status = resp.status();
                    if self.retry.should_retry(attempt) {
                        let delay = self.retry.delay(attempt);
                        self.metrics.record_retry();
                        debug!(
                            op,
                            attempt,
                            status = status.as_u16(),
                            delay_ms = delay.as_millis() as u64,
                            "Retrying transient failure"
                        );
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    let body = resp.text().await.unwrap_or_default();
                    error!(op, attempt, status = status.as_u16(), body, "Retry budget exhausted");
                    return Err(ProjectorError::retry_exhausted(
                        attempt,
                        format!("{} returned {}", op, status),
                    ));
                }
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if self.retry.should_retry(attempt) {
                        let delay = self.retry.delay(attempt);
                        self.metrics.record_retry();
                        debug!(op, attempt, error = %e, delay_ms = delay.as_millis() as u64, "Retrying connection failure");
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    error!(op, attempt, error = %e, "Request failed");
                    return Err(ProjectorError::transport_with_source(
                        format!("{} request failed", op),
                        e,
                    ));
                }
            }
        }
    }
}
