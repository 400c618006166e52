//! Manager that wraps a remote client with typed repository operations
use color_eyre::eyre::WrapErr;
use log::*;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    error::PropagatorError,
    forge::{
        response::ApiResponse,
        traits::RepoClient,
        types::{
            BranchOutcome, ContentFile, CreatePull, CreateRef, GitRef,
            PullRequest, PullRequestOutcome, RepositorySummary, UpdateContent,
        },
    },
    result::Result,
    updater::file::RemoteFile,
};

/// Page size used for every paginated listing (repositories, refs).
pub const PAGE_SIZE: usize = 100;

pub struct ForgeManager {
    client: Arc<dyn RepoClient>,
    dry_run: bool,
}

impl ForgeManager {
    /// Wrap a shared client. With `dry_run` set, write operations are logged
    /// and reported as successful without reaching the API.
    pub fn new(client: Arc<dyn RepoClient>, dry_run: bool) -> Self {
        Self { client, dry_run }
    }

    /// All repositories of an organization, following pagination.
    pub async fn list_org_repos(
        &self,
        org: &str,
    ) -> Result<Vec<RepositorySummary>> {
        let mut repos = vec![];
        let mut page = 1;

        loop {
            let endpoint = format!(
                "orgs/{org}/repos?per_page={PAGE_SIZE}&page={page}"
            );
            let value = self.client.get(&endpoint).await?.into_value(&endpoint)?;
            let batch: Vec<RepositorySummary> = decode(&endpoint, value)?;
            let count = batch.len();
            repos.extend(batch);

            if count < PAGE_SIZE {
                break;
            }

            page += 1;
        }

        debug!("found {} repositories in organization {org}", repos.len());

        Ok(repos)
    }

    /// Fetch and decode a JSON file, from the default branch unless `branch`
    /// is given. A missing file is `None`.
    pub async fn get_file(
        &self,
        repo: &str,
        path: &str,
        branch: Option<&str>,
    ) -> Result<Option<RemoteFile>> {
        let mut endpoint = format!("{repo}/contents/{path}");
        if let Some(branch) = branch {
            endpoint = format!("{endpoint}?ref={branch}");
        }

        match self.client.get(&endpoint).await? {
            ApiResponse::Unexpected { status: 404, .. } => {
                debug!("no file found for endpoint: {endpoint}");
                Ok(None)
            }
            response => {
                let value = response.into_value(&endpoint)?;
                let file: ContentFile = decode(&endpoint, value)?;
                RemoteFile::from_content(file)
                    .wrap_err_with(|| format!("failed to decode {endpoint}"))
            }
        }
    }

    /// List refs, optionally restricted to a namespace such as `tags`,
    /// following pagination. A repository without matching refs yields an
    /// empty list.
    pub async fn get_refs(
        &self,
        repo: &str,
        namespace: Option<&str>,
    ) -> Result<Vec<GitRef>> {
        let base = match namespace {
            Some(namespace) => format!("{repo}/git/refs/{namespace}"),
            None => format!("{repo}/git/refs"),
        };

        let mut refs = vec![];
        let mut page = 1;

        loop {
            let endpoint = format!("{base}?per_page={PAGE_SIZE}&page={page}");

            let value = match self.client.get(&endpoint).await? {
                ApiResponse::Unexpected { status: 404, .. } => {
                    debug!("no refs found for endpoint: {endpoint}");
                    break;
                }
                response => response.into_value(&endpoint)?,
            };

            // a prefix matching exactly one ref comes back as an object
            if !value.is_array() {
                refs.push(decode(&endpoint, value)?);
                break;
            }

            let batch: Vec<GitRef> = decode(&endpoint, value)?;
            let count = batch.len();
            refs.extend(batch);

            if count < PAGE_SIZE {
                break;
            }

            page += 1;
        }

        Ok(refs)
    }

    /// Head ref of a branch.
    pub async fn get_branch_head(
        &self,
        repo: &str,
        branch: &str,
    ) -> Result<GitRef> {
        let endpoint = format!("{repo}/git/refs/heads/{branch}");

        match self.client.get(&endpoint).await? {
            ApiResponse::Unexpected { status: 404, .. } => {
                Err(PropagatorError::MissingHead(branch.to_string()).into())
            }
            response => decode(&endpoint, response.into_value(&endpoint)?),
        }
    }

    /// Create `refs/heads/<branch>` pointing at `sha`. A branch created in
    /// the meantime by a concurrent run is reported, not failed.
    pub async fn create_branch(
        &self,
        repo: &str,
        branch: &str,
        sha: &str,
    ) -> Result<BranchOutcome> {
        let body = CreateRef {
            name: format!("refs/heads/{branch}"),
            sha: sha.to_string(),
        };

        if self.dry_run {
            warn!("dry_run: would create ref in {repo}: {:#?}", body);
            return Ok(BranchOutcome::Created);
        }

        let endpoint = format!("{repo}/git/refs");
        let body = serde_json::to_value(&body).map_err(PropagatorError::from)?;

        match self.client.post(&endpoint, body).await? {
            ApiResponse::Ok(_) => {
                info!("created branch {branch} at {sha} in {repo}");
                Ok(BranchOutcome::Created)
            }
            response if already_exists(&response) => {
                info!("branch {branch} already exists in {repo}");
                Ok(BranchOutcome::AlreadyExists)
            }
            ApiResponse::Unexpected { status, body } => {
                Err(PropagatorError::unexpected(endpoint, status, body).into())
            }
        }
    }

    /// Commit new content for one file.
    pub async fn update_file(
        &self,
        repo: &str,
        path: &str,
        req: UpdateContent,
    ) -> Result<()> {
        if self.dry_run {
            warn!(
                "dry_run: would commit {path} to {} in {repo}: {}",
                req.branch, req.message
            );
            return Ok(());
        }

        let endpoint = format!("{repo}/contents/{path}");
        let body = serde_json::to_value(&req).map_err(PropagatorError::from)?;
        self.client
            .put(&endpoint, body)
            .await?
            .into_value(&endpoint)?;

        info!("committed {path} to {} in {repo}", req.branch);

        Ok(())
    }

    /// Open a pull request. An "already exists" answer is not an error.
    pub async fn create_pull(
        &self,
        repo: &str,
        req: CreatePull,
    ) -> Result<PullRequestOutcome> {
        if self.dry_run {
            warn!("dry_run: would create PR in {repo}: {:#?}", req);
            return Ok(PullRequestOutcome::Created(0));
        }

        let endpoint = format!("{repo}/pulls");
        let body = serde_json::to_value(&req).map_err(PropagatorError::from)?;

        match self.client.post(&endpoint, body).await? {
            ApiResponse::Ok(value) => {
                let pr: PullRequest = decode(&endpoint, value)?;
                info!(
                    "created pull request #{} in {repo}: {}",
                    pr.number,
                    pr.html_url.unwrap_or_default()
                );
                Ok(PullRequestOutcome::Created(pr.number))
            }
            response if already_exists(&response) => {
                info!(
                    "pull request for {} already exists in {repo}",
                    req.head
                );
                Ok(PullRequestOutcome::AlreadyExists)
            }
            ApiResponse::Unexpected { status, body } => {
                Err(PropagatorError::unexpected(endpoint, status, body).into())
            }
        }
    }
}

fn already_exists(response: &ApiResponse) -> bool {
    match response {
        ApiResponse::Unexpected { status, body } => {
            (400..500).contains(status)
                && body.to_lowercase().contains("already exists")
        }
        ApiResponse::Ok(_) => false,
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(PropagatorError::from)
        .wrap_err_with(|| format!("unexpected response shape from {endpoint}"))
}
