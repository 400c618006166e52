//! Webhook server command implementation.
use log::*;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;

use crate::{orchestrator::Propagator, result::Result, webhook};

/// Listen on `addr` and serve webhook deliveries until the process exits.
pub async fn execute(propagator: Arc<Propagator>, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;

    info!(
        "listening for webhook deliveries on http://{}",
        listener.local_addr()?
    );

    axum::serve(listener, webhook::router(propagator)).await?;

    Ok(())
}
