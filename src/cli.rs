//! CLI argument parsing and GitHub connection configuration.
use clap::{Parser, Subcommand};
use color_eyre::eyre::eyre;
use secrecy::SecretString;
use std::{env, net::SocketAddr, time::Duration};

use crate::{
    forge::config::{
        DEFAULT_API_HOST, DEFAULT_REPO_TIMEOUT_SECS, DEFAULT_SCHEME,
        RemoteConfig,
    },
    result::Result,
};

pub const GITHUB_USER_ENV: &str = "GITHUB_USER";
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_API_KEY";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Global CLI arguments for GitHub access and debugging.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "", global = true)]
    /// GitHub user owning the token. Falls back to GITHUB_USER env var.
    pub github_user: String,

    #[arg(long, default_value = "", global = true)]
    /// GitHub personal access token. Falls back to GITHUB_API_KEY env var.
    pub github_token: String,

    #[arg(long, default_value = DEFAULT_API_HOST, global = true)]
    /// GitHub API host.
    pub api_host: String,

    #[arg(long, default_value = DEFAULT_SCHEME, global = true)]
    /// Scheme used to reach the API host (http or https).
    pub scheme: String,

    #[arg(long, default_value_t = DEFAULT_REPO_TIMEOUT_SECS, global = true)]
    /// Seconds allowed for updating a single repository.
    pub repo_timeout: u64,

    #[arg(long, default_value_t = false, global = true)]
    /// Log branch, commit and pull request writes instead of performing them.
    pub dry_run: bool,

    #[arg(long, default_value_t = false, global = true)]
    /// Enable debug logging.
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Propagation subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the webhook endpoint.
    Serve {
        #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
        /// Address to listen on.
        addr: SocketAddr,
    },

    /// Propagate a single release and print the summary.
    Propagate {
        #[arg(long)]
        /// Organization owning the releasing repository.
        org: String,

        #[arg(long)]
        /// Releasing repository name.
        repo: String,

        #[arg(long)]
        /// Released tag, e.g. 4.0.0 or v4.0.0.
        tag: String,

        #[arg(long, default_value = "master")]
        /// Default branch of the releasing repository.
        default_branch: String,
    },
}

impl Args {
    /// Build the API connection config from flags and environment.
    pub fn remote_config(&self) -> Result<RemoteConfig> {
        let user =
            resolve_value(&self.github_user, env::var(GITHUB_USER_ENV).ok());
        let token =
            resolve_value(&self.github_token, env::var(GITHUB_TOKEN_ENV).ok());

        if user.is_empty() {
            return Err(eyre!(
                "must set github user with --github-user or {GITHUB_USER_ENV}"
            ));
        }

        if token.is_empty() {
            return Err(eyre!(
                "must set github token with --github-token or {GITHUB_TOKEN_ENV}"
            ));
        }

        RemoteConfig::builder()
            .user(user)
            .token(SecretString::from(token))
            .host(self.api_host.clone())
            .scheme(self.scheme.clone())
            .dry_run(self.dry_run)
            .build()
    }

    pub fn repo_timeout(&self) -> Duration {
        Duration::from_secs(self.repo_timeout)
    }
}

/// Flag value if given, otherwise the environment value, otherwise empty.
fn resolve_value(arg: &str, env_value: Option<String>) -> String {
    if !arg.is_empty() {
        return arg.to_string();
    }
    env_value.unwrap_or_default()
}
