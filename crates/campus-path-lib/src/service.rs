//! Path service client abstraction
//!
//! The remote service owns the graph and computes shortest paths; this client only
//! lists locations and asks for a path between two of them.

use crate::config::ClientConfig;
use crate::error::{RequestError, classify_failure};
use crate::location::Location;
use crate::query::PathResult;
use serde::de::DeserializeOwned;
use std::future::Future;

/// Trait for path service operations.
///
/// This abstraction allows the coordinator and the location index to be driven by a
/// test double instead of the real HTTP service.
pub trait PathService: Send + Sync + 'static {
    /// `GET /api/nodes`: every known location, in service order
    fn nodes(&self) -> impl Future<Output = Result<Vec<Location>, RequestError>> + Send;

    /// `GET /api/shortest_path?source=..&target=..`
    fn shortest_path(
        &self,
        source: &str,
        target: &str,
    ) -> impl Future<Output = Result<PathResult, RequestError>> + Send;
}

/// Real path service client using reqwest.
#[derive(Clone, Debug)]
pub struct HttpPathService {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpPathService {
    /// Creates a new client for the configured base URL.
    pub fn new(config: ClientConfig) -> Result<Self, RequestError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RequestError::Client(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RequestError> {
        let url = self.config.endpoint(path);
        let mut builder = self.client.get(&url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let request = builder.build().map_err(RequestError::from_reqwest)?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(RequestError::from_reqwest)?;

        let status = response.status();
        let body = response.bytes().await;

        if !status.is_success() {
            // A status arrived, so an unreadable body still classifies by status
            let body = body.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &body));
        }
        let body = body.map_err(RequestError::from_reqwest)?;

        serde_json::from_slice(&body)
            .map_err(|e| RequestError::Client(format!("invalid response body: {e}")))
    }
}

impl PathService for HttpPathService {
    async fn nodes(&self) -> Result<Vec<Location>, RequestError> {
        self.get_json("/api/nodes", &[]).await
    }

    async fn shortest_path(&self, source: &str, target: &str) -> Result<PathResult, RequestError> {
        self.get_json("/api/shortest_path", &[("source", source), ("target", target)])
            .await
    }
}
