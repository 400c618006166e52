//! Per-repository update workflow: decide, branch, commit, open a PR.
use log::*;
use std::{fmt, sync::Arc};

use crate::{
    error::PropagatorError,
    forge::{
        config::{LOCKFILE_PATH, MANIFEST_PATH, PROPAGATION_BRANCH},
        manager::ForgeManager,
        types::{
            BranchOutcome, CreatePull, PullRequestOutcome, RepositorySummary,
            UpdateContent,
        },
    },
    orchestrator::context::ReleaseContext,
    result::Result,
    updater::{
        file::RemoteFile, lockfile::update_lockfile, manifest::update_manifest,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Pending,
    Fetching,
    Deciding,
    Skipped,
    Branching,
    Committing,
    PullRequesting,
    Done,
    Failed,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::Pending => "pending",
            WorkflowState::Fetching => "fetching",
            WorkflowState::Deciding => "deciding",
            WorkflowState::Skipped => "skipped",
            WorkflowState::Branching => "branching",
            WorkflowState::Committing => "committing",
            WorkflowState::PullRequesting => "pull-requesting",
            WorkflowState::Done => "done",
            WorkflowState::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Updated,
    Unchanged,
    Absent,
}

/// What happened to one file of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpdate {
    pub path: String,
    pub status: FileStatus,
}

/// Outcome of a workflow that reached the pull request step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResult {
    pub repository: String,
    pub manifest: FileUpdate,
    pub lockfile: FileUpdate,
    pub pull_request: PullRequestOutcome,
}

impl UpdateResult {
    /// Paths committed by this run, manifest first.
    pub fn updated_files(&self) -> Vec<&str> {
        [&self.manifest, &self.lockfile]
            .into_iter()
            .filter(|file| file.status == FileStatus::Updated)
            .map(|file| file.path.as_str())
            .collect()
    }

    /// Summary line for this repository.
    pub fn describe(&self) -> String {
        let files = self.updated_files();
        if files.is_empty() {
            format!("- {}: Nothing updated", self.repository)
        } else {
            format!("- {}: {} updated", self.repository, files.join(" "))
        }
    }
}

/// Rewriter verdict for one file.
enum Bump {
    Updated(RemoteFile),
    Unchanged,
    Absent,
}

impl Bump {
    fn is_updated(&self) -> bool {
        matches!(self, Bump::Updated(_))
    }

    fn to_file_update(&self, path: &str) -> FileUpdate {
        let status = match self {
            Bump::Updated(_) => FileStatus::Updated,
            Bump::Unchanged => FileStatus::Unchanged,
            Bump::Absent => FileStatus::Absent,
        };
        FileUpdate {
            path: path.to_string(),
            status,
        }
    }
}

pub struct RepoWorkflow<'a> {
    forge: Arc<ForgeManager>,
    repo: &'a RepositorySummary,
    context: &'a ReleaseContext,
    state: WorkflowState,
}

impl<'a> RepoWorkflow<'a> {
    pub fn new(
        forge: Arc<ForgeManager>,
        repo: &'a RepositorySummary,
        context: &'a ReleaseContext,
    ) -> Self {
        Self {
            forge,
            repo,
            context,
            state: WorkflowState::Pending,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Run the workflow to completion. `Ok(None)` means the repository does
    /// not depend on an older version of the released package.
    pub async fn run(&mut self) -> Result<Option<UpdateResult>> {
        match self.execute().await {
            Ok(result) => Ok(result),
            Err(err) => {
                self.transition(WorkflowState::Failed);
                Err(err)
            }
        }
    }

    fn transition(&mut self, next: WorkflowState) {
        debug!("{}: {} -> {}", self.repo.name, self.state, next);
        self.state = next;
    }

    async fn execute(&mut self) -> Result<Option<UpdateResult>> {
        let repo_path = self.repo.api_path();

        self.transition(WorkflowState::Fetching);
        let (manifest, lockfile) = tokio::try_join!(
            self.forge.get_file(&repo_path, MANIFEST_PATH, None),
            self.forge.get_file(&repo_path, LOCKFILE_PATH, None),
        )?;

        self.transition(WorkflowState::Deciding);
        let manifest = self.bump_manifest(manifest)?;
        let lockfile = self.bump_lockfile(lockfile)?;

        if !manifest.is_updated() && !lockfile.is_updated() {
            self.transition(WorkflowState::Skipped);
            return Ok(None);
        }

        self.transition(WorkflowState::Branching);
        let (manifest, lockfile) =
            self.prepare_branch(&repo_path, manifest, lockfile).await?;

        self.transition(WorkflowState::Committing);
        // manifest strictly before lockfile
        for bump in [&manifest, &lockfile] {
            if let Bump::Updated(file) = bump {
                self.commit(&repo_path, file).await?;
            }
        }

        self.transition(WorkflowState::PullRequesting);
        let pull_request = self
            .forge
            .create_pull(
                &repo_path,
                CreatePull {
                    title: self.context.pull_request_title(),
                    body: self.context.pull_request_body(),
                    head: PROPAGATION_BRANCH.to_string(),
                    base: self.repo.default_branch.clone(),
                },
            )
            .await?;

        self.transition(WorkflowState::Done);

        Ok(Some(UpdateResult {
            repository: self.repo.name.clone(),
            manifest: manifest.to_file_update(MANIFEST_PATH),
            lockfile: lockfile.to_file_update(LOCKFILE_PATH),
            pull_request,
        }))
    }

    /// Reuse the propagation branch when it exists, re-applying the bump to
    /// the branch copies; otherwise create it at the default branch head.
    /// A branch that appears between the listing and the creation (another
    /// run for the same release) is reused as well.
    async fn prepare_branch(
        &self,
        repo_path: &str,
        manifest: Bump,
        lockfile: Bump,
    ) -> Result<(Bump, Bump)> {
        let refs = self.forge.get_refs(repo_path, None).await?;
        let branch_ref = format!("refs/heads/{PROPAGATION_BRANCH}");

        if !refs.iter().any(|r| r.name == branch_ref) {
            let head_ref = format!("refs/heads/{}", self.repo.default_branch);
            let head =
                refs.iter().find(|r| r.name == head_ref).ok_or_else(|| {
                    PropagatorError::MissingHead(
                        self.repo.default_branch.clone(),
                    )
                })?;

            let outcome = self
                .forge
                .create_branch(repo_path, PROPAGATION_BRANCH, head.sha())
                .await?;

            if outcome == BranchOutcome::Created {
                return Ok((manifest, lockfile));
            }
        }

        info!("{}: reusing branch {PROPAGATION_BRANCH}", self.repo.name);
        let (manifest, lockfile) = tokio::try_join!(
            self.forge
                .get_file(repo_path, MANIFEST_PATH, Some(PROPAGATION_BRANCH)),
            self.forge
                .get_file(repo_path, LOCKFILE_PATH, Some(PROPAGATION_BRANCH)),
        )?;

        Ok((self.bump_manifest(manifest)?, self.bump_lockfile(lockfile)?))
    }

    fn bump_manifest(&self, file: Option<RemoteFile>) -> Result<Bump> {
        let Some(mut file) = file else {
            return Ok(Bump::Absent);
        };

        let updated = update_manifest(
            &mut file,
            &self.context.package_name,
            &self.context.released,
        )?;

        Ok(if updated {
            Bump::Updated(file)
        } else {
            Bump::Unchanged
        })
    }

    fn bump_lockfile(&self, file: Option<RemoteFile>) -> Result<Bump> {
        let Some(mut file) = file else {
            return Ok(Bump::Absent);
        };

        let updated = update_lockfile(
            &self.context.tag_refs,
            Some(&mut file),
            &self.context.package_name,
            &self.context.released,
            self.context.lock_dependencies.as_ref(),
        )?;

        Ok(if updated {
            Bump::Updated(file)
        } else {
            Bump::Unchanged
        })
    }

    async fn commit(&self, repo_path: &str, file: &RemoteFile) -> Result<()> {
        self.forge
            .update_file(
                repo_path,
                &file.path,
                UpdateContent {
                    message: self.context.commit_message(&file.path),
                    content: file.content.clone(),
                    sha: Some(file.sha.clone()),
                    branch: PROPAGATION_BRANCH.to_string(),
                },
            )
            .await
    }
}
