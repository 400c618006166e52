//! Common test utilities for orchestrator tests.
//!
//! `FakeRemote` answers GETs from a table of endpoints (anything else is a
//! 404) and records every write, so scenarios can assert on what was sent
//! and in which order.
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use crate::{
    forge::{
        config::PROPAGATION_BRANCH, manager::ForgeManager,
        response::ApiResponse,
        traits::{MockRepoClient, RepoClient},
    },
    orchestrator::{Propagator, event::ReleaseEvent},
    test_helpers::{content_json, git_ref_json, not_found, repo_json},
};

pub const ORG: &str = "test_org";
pub const RELEASE_REPO: &str = "repo_1";
pub const PACKAGE: &str = "my-lib";
pub const TAG_SHA: &str = "4e5a5d3c1b9f0e8d7c6b5a493827161504f3e2d1";
pub const HEAD_SHA: &str = "9f8e7d6c5b4a39281706f5e4d3c2b1a098765432";

#[derive(Debug, Clone, PartialEq)]
pub struct Write {
    pub method: &'static str,
    pub endpoint: String,
    pub body: Value,
}

#[derive(Default)]
pub struct FakeRemote {
    gets: HashMap<String, ApiResponse>,
    posts: HashMap<String, ApiResponse>,
    writes: Arc<Mutex<Vec<Write>>>,
}

impl FakeRemote {
    pub fn get(mut self, endpoint: &str, value: Value) -> Self {
        self.gets
            .insert(endpoint.to_string(), ApiResponse::Ok(value));
        self
    }

    pub fn get_response(mut self, endpoint: &str, res: ApiResponse) -> Self {
        self.gets.insert(endpoint.to_string(), res);
        self
    }

    /// Answer for `POST <repo>/pulls`, defaults to a created PR.
    pub fn pull_response(mut self, repo: &str, res: ApiResponse) -> Self {
        self.posts.insert(format!("repos/{ORG}/{repo}/pulls"), res);
        self
    }

    /// Answer for `POST <repo>/git/refs`, defaults to an echo of the new ref.
    pub fn branch_response(mut self, repo: &str, res: ApiResponse) -> Self {
        self.posts.insert(format!("repos/{ORG}/{repo}/git/refs"), res);
        self
    }

    pub fn file(self, repo: &str, path: &str, doc: Value) -> Self {
        let sha = format!("{repo}-{path}-sha");
        self.get(
            &format!("repos/{ORG}/{repo}/contents/{path}"),
            content_json(path, &sha, &doc),
        )
    }

    pub fn branch_file(self, repo: &str, path: &str, doc: Value) -> Self {
        let sha = format!("{repo}-{path}-branch-sha");
        self.get(
            &format!(
                "repos/{ORG}/{repo}/contents/{path}?ref={PROPAGATION_BRANCH}"
            ),
            content_json(path, &sha, &doc),
        )
    }

    /// Branch refs of a dependent repository; `master` is always present.
    pub fn refs(self, repo: &str, with_propagation_branch: bool) -> Self {
        let mut refs = vec![git_ref_json("refs/heads/master", HEAD_SHA)];
        if with_propagation_branch {
            refs.push(git_ref_json(
                &format!("refs/heads/{PROPAGATION_BRANCH}"),
                "abcdef0",
            ));
        }
        self.get(
            &format!("repos/{ORG}/{repo}/git/refs?per_page=100&page=1"),
            json!(refs),
        )
    }

    /// Organization listing plus everything fetched from the releasing
    /// repository.
    pub fn release(self, org_repos: &[&str]) -> Self {
        let repos: Vec<Value> =
            org_repos.iter().map(|name| repo_json(ORG, name)).collect();

        self.get(
            &format!("orgs/{ORG}/repos?per_page=100&page=1"),
            json!(repos),
        )
        .file(RELEASE_REPO, "package.json", release_manifest())
        .file(RELEASE_REPO, "npm-shrinkwrap.json", release_lockfile())
        .get(
            &format!("repos/{ORG}/{RELEASE_REPO}/git/refs/heads/master"),
            git_ref_json("refs/heads/master", HEAD_SHA),
        )
        .get(
            &release_tags_page(1),
            json!([
                git_ref_json("refs/tags/1.0.0", "1111111"),
                git_ref_json("refs/tags/4.0.0", TAG_SHA),
            ]),
        )
    }

    pub fn writes(&self) -> Arc<Mutex<Vec<Write>>> {
        Arc::clone(&self.writes)
    }

    pub fn into_client(self) -> MockRepoClient {
        let mut client = MockRepoClient::new();

        let gets = self.gets;
        client.expect_get().returning(move |endpoint| {
            Ok(gets.get(endpoint).cloned().unwrap_or_else(not_found))
        });

        let writes = Arc::clone(&self.writes);
        let posts = self.posts;
        client.expect_post().returning(move |endpoint, body| {
            writes.lock().unwrap().push(Write {
                method: "POST",
                endpoint: endpoint.to_string(),
                body: body.clone(),
            });

            if let Some(res) = posts.get(endpoint) {
                return Ok(res.clone());
            }

            if endpoint.ends_with("/pulls") {
                return Ok(ApiResponse::Ok(json!({"number": 1})));
            }

            Ok(ApiResponse::Ok(json!({
                "ref": body["ref"],
                "object": {"sha": body["sha"]}
            })))
        });

        let writes = Arc::clone(&self.writes);
        client.expect_put().returning(move |endpoint, body| {
            writes.lock().unwrap().push(Write {
                method: "PUT",
                endpoint: endpoint.to_string(),
                body: body.clone(),
            });
            Ok(ApiResponse::Ok(json!({"content": {}})))
        });

        client
    }
}

pub fn release_manifest() -> Value {
    json!({
        "name": PACKAGE,
        "version": "4.0.0",
        "dependencies": {"lodash": "^4.17.0"}
    })
}

pub fn release_lockfile() -> Value {
    json!({
        "name": PACKAGE,
        "version": "4.0.0",
        "dependencies": {
            "lodash": {"version": "4.17.21"}
        }
    })
}

pub fn dependent_manifest(constraint: &str) -> Value {
    json!({
        "name": "app",
        "version": "0.1.0",
        "dependencies": {
            "left-pad": "1.1.0",
            PACKAGE: constraint
        }
    })
}

pub fn dependent_lockfile(version: &str) -> Value {
    json!({
        "name": "app",
        "version": "0.1.0",
        "dependencies": {
            "left-pad": {"version": "1.1.0"},
            PACKAGE: {
                "version": version,
                "from": format!("github:{ORG}/{PACKAGE}#{version}"),
                "resolved": format!("git://github.com/{ORG}/{PACKAGE}.git#1111111")
            }
        }
    })
}

pub fn release_event(tag: &str) -> ReleaseEvent {
    ReleaseEvent {
        organization: ORG.to_string(),
        repository: RELEASE_REPO.to_string(),
        tag: tag.to_string(),
        default_branch: "master".to_string(),
    }
}

/// Endpoint of one page of the releasing repository's tag listing.
pub fn release_tags_page(page: usize) -> String {
    format!("repos/{ORG}/{RELEASE_REPO}/git/refs/tags?per_page=100&page={page}")
}

pub fn create_test_propagator(client: MockRepoClient) -> Propagator {
    create_test_propagator_with(client, false, Duration::from_secs(5))
}

pub fn create_test_propagator_with(
    client: impl RepoClient + 'static,
    dry_run: bool,
    repo_timeout: Duration,
) -> Propagator {
    let forge = Arc::new(ForgeManager::new(Arc::new(client), dry_run));
    Propagator::builder()
        .forge(forge)
        .repo_timeout(repo_timeout)
        .build()
        .unwrap()
}

/// Writes sent for one repository, in the order they were made.
pub fn writes_for(writes: &Arc<Mutex<Vec<Write>>>, repo: &str) -> Vec<Write> {
    let prefix = format!("repos/{ORG}/{repo}/");
    writes
        .lock()
        .unwrap()
        .iter()
        .filter(|write| write.endpoint.starts_with(&prefix))
        .cloned()
        .collect()
}
