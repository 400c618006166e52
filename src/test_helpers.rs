//! Common test helper functions shared across test modules.
//!
//! Fixtures for remote configuration, API payloads and decoded files, so
//! the individual suites only spell out what they are asserting on.
use base64::{Engine, prelude::BASE64_STANDARD};
use secrecy::SecretString;
use serde_json::{Value, json};

use crate::{
    forge::{
        config::{DEFAULT_API_HOST, DEFAULT_SCHEME, RemoteConfig},
        response::ApiResponse,
        types::{GitRef, RefObject},
    },
    updater::file::{ContentEncoding, RemoteFile},
};

/// Creates a test RemoteConfig with sensible defaults.
///
/// # Example
/// ```ignore
/// let config = create_test_remote_config();
/// ```
pub fn create_test_remote_config() -> RemoteConfig {
    RemoteConfig {
        user: "test-user".to_string(),
        token: SecretString::from("test-token".to_string()),
        host: DEFAULT_API_HOST.to_string(),
        scheme: DEFAULT_SCHEME.to_string(),
        dry_run: false,
    }
}

/// Pretty JSON text the way files are written back to a repository.
pub fn pretty(doc: &Value) -> String {
    let mut text = serde_json::to_string_pretty(doc).unwrap();
    text.push('\n');
    text
}

/// Creates a base64 encoded RemoteFile holding `doc`.
pub fn remote_file(path: &str, doc: Value) -> RemoteFile {
    RemoteFile {
        path: path.to_string(),
        sha: format!("{path}-sha"),
        encoding: ContentEncoding::Base64,
        content: BASE64_STANDARD.encode(pretty(&doc)),
        document: doc,
    }
}

/// Creates a GitRef with the given name and commit sha.
pub fn git_ref(name: &str, sha: &str) -> GitRef {
    GitRef {
        name: name.to_string(),
        object: RefObject {
            sha: sha.to_string(),
        },
    }
}

/// JSON form of a ref as returned by `git/refs`.
pub fn git_ref_json(name: &str, sha: &str) -> Value {
    json!({"ref": name, "object": {"sha": sha, "type": "commit"}})
}

/// Contents API payload for a JSON document.
///
/// The base64 body is wrapped at 60 columns like the real API does.
pub fn content_json(path: &str, sha: &str, doc: &Value) -> Value {
    let encoded = BASE64_STANDARD.encode(pretty(doc));
    let wrapped = encoded
        .as_bytes()
        .chunks(60)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\n");

    json!({
        "type": "file",
        "path": path,
        "sha": sha,
        "encoding": "base64",
        "content": wrapped
    })
}

/// Organization repository listing entry.
pub fn repo_json(org: &str, name: &str) -> Value {
    json!({
        "name": name,
        "owner": {"login": org},
        "default_branch": "master"
    })
}

/// 404 answer as returned by the API for missing resources.
pub fn not_found() -> ApiResponse {
    ApiResponse::Unexpected {
        status: 404,
        body: r#"{"message":"Not Found"}"#.to_string(),
    }
}

/// Decode the base64 `content` of a PUT contents body back to JSON.
pub fn decode_put_body(body: &Value) -> Value {
    let content = body["content"].as_str().unwrap();
    let bytes = BASE64_STANDARD.decode(content).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
