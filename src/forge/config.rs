//! Configuration for the GitHub API connection.
use derive_builder::Builder;
use secrecy::SecretString;

use crate::{error::PropagatorError, result::Result};

/// Branch that receives every propagation commit, in every repository.
pub const PROPAGATION_BRANCH: &str = "release-propagation";
/// Dependency manifest path relative to repository root.
pub const MANIFEST_PATH: &str = "package.json";
/// Lockfile path relative to repository root.
pub const LOCKFILE_PATH: &str = "npm-shrinkwrap.json";
/// Default GitHub API host.
pub const DEFAULT_API_HOST: &str = "api.github.com";
/// Default URL scheme for the API host.
pub const DEFAULT_SCHEME: &str = "https";
/// Value of the User-Agent header sent with every request.
pub const USER_AGENT: &str = "release-propagator-webhook";
/// Default per-repository workflow timeout in seconds.
pub const DEFAULT_REPO_TIMEOUT_SECS: u64 = 120;

/// Remote API connection configuration for authenticating against GitHub.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(private, name = "_build"))]
pub struct RemoteConfig {
    /// GitHub user the token belongs to.
    pub user: String,
    /// Personal access token for authentication.
    pub token: SecretString,
    /// API host (e.g., "api.github.com").
    #[builder(default = "DEFAULT_API_HOST.to_string()")]
    pub host: String,
    /// URL scheme (http or https).
    #[builder(default = "DEFAULT_SCHEME.to_string()")]
    pub scheme: String,
    /// Log write operations instead of performing them.
    #[builder(default)]
    pub dry_run: bool,
}

impl RemoteConfig {
    pub fn builder() -> RemoteConfigBuilder {
        RemoteConfigBuilder::default()
    }

    /// Base URL every relative endpoint is joined onto.
    pub fn base_url(&self) -> String {
        format!("{}://{}/", self.scheme, self.host)
    }
}

impl RemoteConfigBuilder {
    pub fn build(&self) -> Result<RemoteConfig> {
        let config = self._build().map_err(|e| {
            PropagatorError::invalid_config(format!(
                "failed to build remote config: {e}"
            ))
        })?;

        if config.user.is_empty() {
            return Err(PropagatorError::invalid_config(
                "github user must not be empty",
            )
            .into());
        }

        if config.scheme != "http" && config.scheme != "https" {
            return Err(PropagatorError::invalid_config(format!(
                "unsupported scheme: {}",
                config.scheme
            ))
            .into());
        }

        Ok(config)
    }
}
