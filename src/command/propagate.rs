//! Single release propagation command implementation.
use color_eyre::eyre::eyre;
use log::*;

use crate::{
    orchestrator::{Propagator, event::ReleaseEvent},
    result::Result,
};

/// Propagate one release and print the summary to stdout. Fails when any
/// dependent repository could not be updated.
pub async fn execute(propagator: &Propagator, event: ReleaseEvent) -> Result<()> {
    let summary = propagator.propagate(&event).await?;

    let rendered = summary.render();
    if rendered.is_empty() {
        info!("no repository depends on an older {}", event.repository);
    } else {
        println!("{rendered}");
    }

    let failures = summary.failure_count();
    if failures > 0 {
        for (repository, error) in summary.failures() {
            error!("{repository}: {error}");
        }
        return Err(eyre!("{failures} repositories failed to update"));
    }

    Ok(())
}
