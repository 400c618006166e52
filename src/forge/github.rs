//! Implements the RepoClient trait for the GitHub REST API
use async_trait::async_trait;
use log::*;
use reqwest::{
    Client, Method, StatusCode, Url,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT as USER_AGENT_HEADER},
};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::{
    error::PropagatorError,
    forge::{
        config::{RemoteConfig, USER_AGENT},
        response::ApiResponse,
        traits::RepoClient,
    },
    result::Result,
};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// GitHub client using reqwest with basic authentication.
///
/// Constructed once per process and shared; it holds no per-call state.
pub struct GithubClient {
    base_url: Url,
    client: Client,
    user: String,
    token: SecretString,
}

impl GithubClient {
    /// Create a GitHub client with user / token authentication against the
    /// configured API host.
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.append(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT));
        headers.append(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(PropagatorError::from)?;

        let base_url =
            Url::parse(&config.base_url()).map_err(PropagatorError::from)?;

        Ok(Self {
            base_url,
            client,
            user: config.user.clone(),
            token: config.token.clone(),
        })
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        expected: &[StatusCode],
    ) -> Result<ApiResponse> {
        let url = self
            .base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(PropagatorError::from)?;

        debug!("{method} {endpoint}");

        let mut request = self
            .client
            .request(method.clone(), url)
            .basic_auth(&self.user, Some(self.token.expose_secret()));

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(PropagatorError::from)?;
        let status = response.status();
        let text = response.text().await.map_err(PropagatorError::from)?;

        if !expected.contains(&status) {
            debug!("{method} {endpoint}: unexpected status {status}");
            return Ok(ApiResponse::Unexpected {
                status: status.as_u16(),
                body: text,
            });
        }

        let value: Value =
            serde_json::from_str(&text).map_err(PropagatorError::from)?;

        Ok(ApiResponse::Ok(value))
    }
}

#[async_trait]
impl RepoClient for GithubClient {
    async fn get(&self, endpoint: &str) -> Result<ApiResponse> {
        self.send(Method::GET, endpoint, None, &[StatusCode::OK])
            .await
    }

    async fn post(&self, endpoint: &str, body: Value) -> Result<ApiResponse> {
        self.send(Method::POST, endpoint, Some(body), &[StatusCode::CREATED])
            .await
    }

    async fn put(&self, endpoint: &str, body: Value) -> Result<ApiResponse> {
        // contents API answers 201 when the PUT creates the file
        self.send(
            Method::PUT,
            endpoint,
            Some(body),
            &[StatusCode::OK, StatusCode::CREATED],
        )
        .await
    }
}
