//! Traits related to the remote repository API
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde_json::Value;

use crate::{forge::response::ApiResponse, result::Result};

/// Authenticated request primitive against a hosted repository API.
///
/// Endpoints are relative paths (e.g. `orgs/acme/repos`); implementations
/// prefix scheme, host and credentials.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RepoClient: Send + Sync {
    /// GET an endpoint, success status is 200.
    async fn get(&self, endpoint: &str) -> Result<ApiResponse>;
    /// POST a JSON body, success status is 201.
    async fn post(&self, endpoint: &str, body: Value) -> Result<ApiResponse>;
    /// PUT a JSON body, success status is 200.
    async fn put(&self, endpoint: &str, body: Value) -> Result<ApiResponse>;
}
