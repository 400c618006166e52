use log::*;
use serde_json::{Value, json};

use crate::{
    error::PropagatorError,
    forge::types::GitRef,
    result::Result,
    updater::{
        file::RemoteFile,
        version::{ReleasedVersion, replace_trailing_version, trailing_version},
    },
};

/// Bump the locked entry for `dependency` in an npm-shrinkwrap.json.
///
/// Gated like the manifest bump on the entry's `version`. When it applies,
/// `version`, `from` and `resolved` are rewritten and the entry's nested
/// `dependencies` are replaced with `release_dependencies`, the top-level
/// dependency tree of the releasing repository's own lockfile. The released
/// tag must be present in `refs`.
pub fn update_lockfile(
    refs: &[GitRef],
    file: Option<&mut RemoteFile>,
    dependency: &str,
    released: &ReleasedVersion,
    release_dependencies: Option<&Value>,
) -> Result<bool> {
    let Some(file) = file else {
        return Ok(false);
    };

    let mut doc = file.document.clone();

    let Some(entry) = doc
        .get_mut("dependencies")
        .and_then(|deps| deps.get_mut(dependency))
        .and_then(Value::as_object_mut)
    else {
        return Ok(false);
    };

    let Some(locked) = entry.get("version").and_then(Value::as_str) else {
        warn!("{}: {dependency} has no locked version: skipping", file.path);
        return Ok(false);
    };

    let Some(current) = trailing_version(locked)? else {
        warn!(
            "{}: no trailing version in locked version '{locked}' for {dependency}: skipping",
            file.path
        );
        return Ok(false);
    };

    if !released.is_newer_than(&current) {
        debug!(
            "{}: {dependency} locked at {current}, released {released}: nothing to do",
            file.path
        );
        return Ok(false);
    }

    let sha = find_tag_sha(refs, released)?;

    entry.insert("version".into(), json!(released.version.to_string()));

    if let Some(from) = entry.get("from").and_then(Value::as_str) {
        let from = replace_trailing_version(from, released)?;
        entry.insert("from".into(), json!(from));
    }

    if let Some(resolved) = entry.get("resolved").and_then(Value::as_str) {
        let resolved = replace_commit_fragment(resolved, sha);
        entry.insert("resolved".into(), json!(resolved));
    }

    match release_dependencies {
        Some(deps) if deps.as_object().is_some_and(|d| !d.is_empty()) => {
            entry.insert("dependencies".into(), deps.clone());
        }
        _ => {
            entry.shift_remove("dependencies");
        }
    }

    info!("{}: locking {dependency} to {released} at {sha}", file.path);
    file.set_document(doc)?;

    Ok(true)
}

/// Commit SHA of the released tag.
fn find_tag_sha<'a>(
    refs: &'a [GitRef],
    released: &ReleasedVersion,
) -> Result<&'a str> {
    let candidates = released.tag_ref_candidates();
    candidates
        .iter()
        .find_map(|name| refs.iter().find(|r| &r.name == name))
        .map(GitRef::sha)
        .ok_or_else(|| PropagatorError::TagNotFound(released.tag.clone()).into())
}

/// Replace whatever follows the last `#` of a source locator with `sha`.
fn replace_commit_fragment(resolved: &str, sha: &str) -> String {
    match resolved.rsplit_once('#') {
        Some((locator, _)) => format!("{locator}#{sha}"),
        None => format!("{resolved}#{sha}"),
    }
}
