use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}

/// Organization member repository as returned by `orgs/<org>/repos`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub owner: RepositoryOwner,
    #[serde(default = "default_branch_name")]
    pub default_branch: String,
}

impl RepositorySummary {
    /// Relative API path every repository endpoint hangs off.
    pub fn api_path(&self) -> String {
        format!("repos/{}/{}", self.owner.login, self.name)
    }
}

pub fn default_branch_name() -> String {
    "master".to_string()
}

/// Raw file handle from `repos/<owner>/<repo>/contents/<path>`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentFile {
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefObject {
    pub sha: String,
}

/// Single git ref from `git/refs`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub name: String,
    pub object: RefObject,
}

impl GitRef {
    pub fn sha(&self) -> &str {
        &self.object.sha
    }
}

#[derive(Debug, Serialize)]
pub struct CreateRef {
    #[serde(rename = "ref")]
    pub name: String,
    pub sha: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateContent {
    pub message: String,
    pub content: String,
    /// Omitted when the file does not exist on the target branch yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub branch: String,
}

#[derive(Debug, Serialize)]
pub struct CreatePull {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

#[derive(Debug, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Result of asking the API to create the propagation branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchOutcome {
    Created,
    AlreadyExists,
}

/// Result of asking the API to open a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestOutcome {
    Created(u64),
    AlreadyExists,
}
