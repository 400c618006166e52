//! Access to the hosted repository API (GitHub).
//!
//! Provides the authenticated request primitive, wire types and a typed
//! manager used by the propagation workflow.

/// Configuration and authentication for the API connection.
pub mod config;

/// GitHub REST client implementation.
pub mod github;

/// Typed repository operations built on a [`traits::RepoClient`].
pub mod manager;

/// Tagged response shape returned by every client call.
pub mod response;

/// Common traits for the remote client abstraction.
pub mod traits;

/// Wire types for repositories, contents, refs and pull requests.
pub mod types;
