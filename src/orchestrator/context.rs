use serde_json::Value;

use crate::{
    forge::types::GitRef, orchestrator::event::ReleaseEvent,
    updater::version::ReleasedVersion,
};

/// Everything learned about the releasing repository before fan-out.
/// Shared read-only by every repository workflow of a run.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    pub event: ReleaseEvent,
    /// Package name dependents refer to the release by.
    pub package_name: String,
    pub released: ReleasedVersion,
    /// Tag refs of the releasing repository.
    pub tag_refs: Vec<GitRef>,
    /// Head of the releasing repository's default branch.
    pub head: GitRef,
    /// Top-level `dependencies` of the releasing repository's lockfile.
    pub lock_dependencies: Option<Value>,
}

impl ReleaseContext {
    pub fn pull_request_title(&self) -> String {
        format!("Bump {} to {}", self.package_name, self.released)
    }

    pub fn pull_request_body(&self) -> String {
        format!(
            "{}/{} released `{}` from {}.",
            self.event.organization,
            self.event.repository,
            self.released.tag,
            self.head.sha(),
        )
    }

    /// Commit message for bumping the released package in one file.
    pub fn commit_message(&self, path: &str) -> String {
        format!("Bump {} to {} in {path}", self.package_name, self.released)
    }
}
