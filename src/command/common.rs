//! Common functionality shared between commands
use log::*;
use std::sync::Arc;

use crate::{
    cli::Args,
    forge::{github::GithubClient, manager::ForgeManager},
    orchestrator::Propagator,
    result::Result,
};

/// Build the propagator described by the CLI arguments.
pub fn build_propagator(args: &Args) -> Result<Arc<Propagator>> {
    let remote = args.remote_config()?;

    if remote.dry_run {
        warn!("dry_run: no branch, commit or pull request will be created");
    }

    debug!("using GitHub API at {}", remote.base_url());

    let client = GithubClient::new(&remote)?;
    let forge = Arc::new(ForgeManager::new(Arc::new(client), remote.dry_run));

    let propagator = Propagator::builder()
        .forge(forge)
        .repo_timeout(args.repo_timeout())
        .build()?;

    Ok(Arc::new(propagator))
}
