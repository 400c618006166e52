//! Tests for the single repository workflow.
//!
//! Tests for:
//! - Strict ordering of branch, commit and pull request calls
//! - Missing default branch head
//! - Final workflow state

use mockall::Sequence;
use serde_json::json;
use std::sync::Arc;

use super::common::*;
use crate::{
    error::PropagatorError,
    forge::{
        config::PROPAGATION_BRANCH,
        manager::ForgeManager,
        response::ApiResponse,
        traits::MockRepoClient,
        types::{PullRequestOutcome, RepositoryOwner, RepositorySummary},
    },
    orchestrator::{
        context::ReleaseContext,
        workflow::{FileStatus, RepoWorkflow, WorkflowState},
    },
    test_helpers::{content_json, git_ref, git_ref_json, not_found},
    updater::version::ReleasedVersion,
};

fn repo() -> RepositorySummary {
    RepositorySummary {
        name: "repo_4".into(),
        owner: RepositoryOwner { login: ORG.into() },
        default_branch: "main".into(),
    }
}

fn context() -> ReleaseContext {
    ReleaseContext {
        event: release_event("4.0.0"),
        package_name: PACKAGE.into(),
        released: ReleasedVersion::parse("4.0.0").unwrap(),
        tag_refs: vec![git_ref("refs/tags/4.0.0", TAG_SHA)],
        head: git_ref("refs/heads/master", HEAD_SHA),
        lock_dependencies: None,
    }
}

fn expect_files(client: &mut MockRepoClient) {
    client.expect_get().returning(|endpoint| {
        let endpoint = endpoint.to_string();
        let res = match endpoint.as_str() {
            "repos/test_org/repo_4/contents/package.json" => {
                ApiResponse::Ok(content_json(
                    "package.json",
                    "manifest-sha",
                    &dependent_manifest("^1.0.0"),
                ))
            }
            "repos/test_org/repo_4/contents/npm-shrinkwrap.json" => {
                ApiResponse::Ok(content_json(
                    "npm-shrinkwrap.json",
                    "lock-sha",
                    &dependent_lockfile("1.0.0"),
                ))
            }
            "repos/test_org/repo_4/git/refs?per_page=100&page=1" => {
                ApiResponse::Ok(json!([git_ref_json(
                    "refs/heads/main",
                    "main-head"
                )]))
            }
            _ => not_found(),
        };
        Ok(res)
    });
}

#[tokio::test]
#[test_log::test]
async fn writes_are_strictly_sequenced() {
    let mut client = MockRepoClient::new();
    let mut seq = Sequence::new();
    expect_files(&mut client);

    client
        .expect_post()
        .withf(|endpoint, body| {
            endpoint == "repos/test_org/repo_4/git/refs"
                && body["sha"] == json!("main-head")
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(ApiResponse::Ok(json!({}))));
    client
        .expect_put()
        .withf(|endpoint, body| {
            endpoint == "repos/test_org/repo_4/contents/package.json"
                && body["sha"] == json!("manifest-sha")
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(ApiResponse::Ok(json!({}))));
    client
        .expect_put()
        .withf(|endpoint, body| {
            endpoint == "repos/test_org/repo_4/contents/npm-shrinkwrap.json"
                && body["sha"] == json!("lock-sha")
                && body["message"]
                    == json!("Bump my-lib to 4.0.0 in npm-shrinkwrap.json")
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(ApiResponse::Ok(json!({}))));
    client
        .expect_post()
        .withf(|endpoint, body| {
            endpoint == "repos/test_org/repo_4/pulls"
                && body["head"] == json!(PROPAGATION_BRANCH)
                && body["base"] == json!("main")
        })
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(ApiResponse::Ok(json!({"number": 12}))));

    let forge = Arc::new(ForgeManager::new(Arc::new(client), false));
    let repo = repo();
    let context = context();
    let mut workflow = RepoWorkflow::new(forge, &repo, &context);

    let result = workflow.run().await.unwrap().unwrap();

    assert_eq!(workflow.state(), WorkflowState::Done);
    assert_eq!(result.manifest.status, FileStatus::Updated);
    assert_eq!(result.lockfile.status, FileStatus::Updated);
    assert_eq!(result.pull_request, PullRequestOutcome::Created(12));
}

#[tokio::test]
#[test_log::test]
async fn missing_default_head_fails_before_writing() {
    let mut client = MockRepoClient::new();
    client.expect_get().returning(|endpoint| {
        let endpoint = endpoint.to_string();
        if endpoint.ends_with("package.json") {
            Ok(ApiResponse::Ok(content_json(
                "package.json",
                "manifest-sha",
                &dependent_manifest("1.0.0"),
            )))
        } else if endpoint.contains("git/refs?") {
            Ok(ApiResponse::Ok(json!([])))
        } else {
            Ok(not_found())
        }
    });
    client.expect_post().times(0);
    client.expect_put().times(0);

    let forge = Arc::new(ForgeManager::new(Arc::new(client), false));
    let repo = repo();
    let context = context();
    let mut workflow = RepoWorkflow::new(forge, &repo, &context);

    let err = workflow.run().await.unwrap_err();

    assert_eq!(workflow.state(), WorkflowState::Failed);
    assert!(matches!(
        err.downcast_ref::<PropagatorError>(),
        Some(PropagatorError::MissingHead(branch)) if branch == "main"
    ));
}

#[tokio::test]
#[test_log::test]
async fn repository_without_manifest_is_skipped() {
    let mut client = MockRepoClient::new();
    client.expect_get().returning(|_| Ok(not_found()));
    client.expect_post().times(0);

    let forge = Arc::new(ForgeManager::new(Arc::new(client), false));
    let repo = repo();
    let context = context();
    let mut workflow = RepoWorkflow::new(forge, &repo, &context);

    let result = workflow.run().await.unwrap();

    assert!(result.is_none());
    assert_eq!(workflow.state(), WorkflowState::Skipped);
}

#[tokio::test]
#[test_log::test]
async fn fetch_failure_is_an_error() {
    let mut client = MockRepoClient::new();
    client.expect_get().returning(|_| {
        Ok(ApiResponse::Unexpected {
            status: 502,
            body: "bad gateway".into(),
        })
    });

    let forge = Arc::new(ForgeManager::new(Arc::new(client), false));
    let repo = repo();
    let context = context();
    let mut workflow = RepoWorkflow::new(forge, &repo, &context);

    assert!(workflow.run().await.is_err());
    assert_eq!(workflow.state(), WorkflowState::Failed);
}
