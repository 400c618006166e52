//! Error handling and result types for release propagation.
//!
//! All fallible functions in this crate return the `Result<T>` type defined
//! here. Typed failures are raised as [`crate::error::PropagatorError`] and
//! converted into a `color_eyre::Report` by `?`, so callers can add context
//! with `.wrap_err()` as errors propagate.
//!
//! ```rust,ignore
//! use color_eyre::eyre::Context;
//! use crate::result::Result;
//!
//! async fn load(manager: &ForgeManager) -> Result<Vec<RepositorySummary>> {
//!     manager
//!         .list_org_repos("my-org")
//!         .await
//!         .wrap_err("failed to list organization repositories")
//! }
//! ```

use color_eyre::eyre::Result as EyreResult;

/// Standard result type used throughout the crate.
pub type Result<T> = EyreResult<T>;
