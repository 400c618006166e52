//! Fans a release out to every other repository of its organization.
use color_eyre::eyre::eyre;
use derive_builder::Builder;
use futures_util::future::join_all;
use log::*;
use std::{sync::Arc, time::Duration};

use crate::{
    error::PropagatorError,
    forge::{
        config::{DEFAULT_REPO_TIMEOUT_SECS, LOCKFILE_PATH, MANIFEST_PATH},
        manager::ForgeManager,
        types::RepositorySummary,
    },
    orchestrator::{
        context::ReleaseContext,
        event::ReleaseEvent,
        summary::{RepoOutcome, Summary},
        workflow::RepoWorkflow,
    },
    result::Result,
    updater::{manifest::package_name, version::ReleasedVersion},
};

pub mod context;
pub mod event;
pub mod summary;
pub mod workflow;

#[derive(Builder)]
#[builder(setter(into), build_fn(private, name = "_build"))]
pub struct PropagatorParams {
    pub forge: Arc<ForgeManager>,
    #[builder(default = "Duration::from_secs(DEFAULT_REPO_TIMEOUT_SECS)")]
    pub repo_timeout: Duration,
}

impl PropagatorParamsBuilder {
    pub fn build(&self) -> Result<Propagator> {
        let params = self._build().map_err(|e| {
            PropagatorError::invalid_config(format!(
                "Failed to build propagator: {}",
                e
            ))
        })?;
        Ok(Propagator::new(params))
    }
}

pub struct Propagator {
    forge: Arc<ForgeManager>,
    repo_timeout: Duration,
}

impl Propagator {
    pub fn builder() -> PropagatorParamsBuilder {
        PropagatorParamsBuilder::default()
    }

    pub fn new(params: PropagatorParams) -> Self {
        Self {
            forge: params.forge,
            repo_timeout: params.repo_timeout,
        }
    }

    /// Propagate a release into every dependent repository.
    ///
    /// Fails as a whole only when the releasing repository itself cannot be
    /// inspected; per-repository failures are recorded in the summary.
    pub async fn propagate(&self, event: &ReleaseEvent) -> Result<Summary> {
        let released = ReleasedVersion::parse(&event.tag)?;
        let release_path = event.api_path();

        info!(
            "propagating {}/{} {} to organization repositories",
            event.organization, event.repository, released.tag
        );

        let (repos, manifest, lockfile, head, tag_refs) = tokio::try_join!(
            self.forge.list_org_repos(&event.organization),
            self.forge.get_file(&release_path, MANIFEST_PATH, None),
            self.forge.get_file(&release_path, LOCKFILE_PATH, None),
            self.forge
                .get_branch_head(&release_path, &event.default_branch),
            self.forge.get_refs(&release_path, Some("tags")),
        )?;

        let manifest = manifest.ok_or_else(|| {
            eyre!("{} has no {MANIFEST_PATH}", event.repository)
        })?;

        let context = ReleaseContext {
            event: event.clone(),
            package_name: package_name(&manifest.document, &event.repository),
            released,
            tag_refs,
            head,
            lock_dependencies: lockfile
                .and_then(|file| file.document.get("dependencies").cloned()),
        };

        debug!(
            "released package {} at {}",
            context.package_name,
            context.head.sha()
        );

        let dependents: Vec<RepositorySummary> = repos
            .into_iter()
            .filter(|repo| repo.name != event.repository)
            .collect();

        let outcomes = join_all(
            dependents
                .iter()
                .map(|repo| self.run_repository(repo, &context)),
        )
        .await;

        let summary = Summary::new(outcomes);

        info!(
            "propagation of {} done: {} updated, {} skipped, {} failed",
            context.package_name,
            summary.updated().count(),
            summary.skipped_count(),
            summary.failure_count()
        );

        Ok(summary)
    }

    async fn run_repository(
        &self,
        repo: &RepositorySummary,
        context: &ReleaseContext,
    ) -> RepoOutcome {
        let mut workflow =
            RepoWorkflow::new(Arc::clone(&self.forge), repo, context);

        let result =
            match tokio::time::timeout(self.repo_timeout, workflow.run()).await {
                Ok(result) => result,
                Err(_) => {
                    Err(PropagatorError::Timeout(self.repo_timeout).into())
                }
            };

        match result {
            Ok(Some(update)) => {
                info!("{}", update.describe());
                RepoOutcome::Updated(update)
            }
            Ok(None) => {
                debug!(
                    "{}: no older dependency on {}",
                    repo.name, context.package_name
                );
                RepoOutcome::Skipped(repo.name.clone())
            }
            Err(err) => {
                error!("{}: propagation failed: {err:#}", repo.name);
                RepoOutcome::Failed {
                    repository: repo.name.clone(),
                    error: format!("{err:#}"),
                }
            }
        }
    }
}
