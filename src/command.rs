//! Command execution for release-propagator.
//!
//! Both commands share the same wiring: a GitHub client built from the CLI
//! arguments, wrapped in a forge manager and handed to a propagator.
//!
//! - **serve**: listen for organization webhooks and propagate every
//!   `release` event delivered to `POST /{org}`
//! - **propagate**: run a single propagation from the command line and print
//!   the summary

/// Wiring shared by every command.
pub mod common;

/// Run the webhook server.
pub mod serve;

/// One-shot propagation of a single release.
pub mod propagate;
