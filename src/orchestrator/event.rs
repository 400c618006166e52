//! Release event parsed from a webhook delivery or given on the command line
use serde_json::Value;

use crate::{error::PropagatorError, forge::types::default_branch_name};

/// A version released by one repository of an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEvent {
    pub organization: String,
    pub repository: String,
    /// Tag as published, `v` prefix included when present.
    pub tag: String,
    pub default_branch: String,
}

impl ReleaseEvent {
    /// Build an event from a GitHub `release` payload. The organization is
    /// taken from the route the payload was delivered to.
    pub fn from_payload(
        organization: &str,
        payload: &Value,
    ) -> Result<Self, PropagatorError> {
        let repository = payload["repository"]["name"]
            .as_str()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                PropagatorError::invalid_event("missing repository.name")
            })?;

        let tag = payload["release"]["tag_name"]
            .as_str()
            .filter(|tag| !tag.is_empty())
            .ok_or_else(|| {
                PropagatorError::invalid_event("missing release.tag_name")
            })?;

        let default_branch = payload["repository"]["default_branch"]
            .as_str()
            .filter(|branch| !branch.is_empty())
            .map(str::to_string)
            .unwrap_or_else(default_branch_name);

        Ok(Self {
            organization: organization.to_string(),
            repository: repository.to_string(),
            tag: tag.to_string(),
            default_branch,
        })
    }

    /// API path of the releasing repository.
    pub fn api_path(&self) -> String {
        format!("repos/{}/{}", self.organization, self.repository)
    }
}
