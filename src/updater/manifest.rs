use log::*;
use serde_json::{Value, json};

use crate::{
    result::Result,
    updater::{
        file::RemoteFile,
        version::{ReleasedVersion, replace_trailing_version, trailing_version},
    },
};

/// Dependency groups of a package.json, in lookup precedence order.
pub const DEPENDENCY_GROUPS: [&str; 2] = ["dependencies", "devDependencies"];

/// Bump `dependency` in a package.json to the released version.
///
/// Only the first group (runtime before dev) declaring the dependency is
/// touched. Returns `false` and leaves the file untouched when the
/// dependency is absent, its constraint carries no trailing
/// `major.minor.patch`, or the released version is not strictly newer.
pub fn update_manifest(
    file: &mut RemoteFile,
    dependency: &str,
    released: &ReleasedVersion,
) -> Result<bool> {
    let mut doc = file.document.clone();

    let Some(group) = DEPENDENCY_GROUPS
        .iter()
        .find(|group| doc[**group].get(dependency).is_some())
    else {
        return Ok(false);
    };

    let Some(constraint) = doc[*group][dependency].as_str().map(str::to_string)
    else {
        warn!(
            "{}: {group}.{dependency} is not a string constraint: skipping",
            file.path
        );
        return Ok(false);
    };

    let Some(current) = trailing_version(&constraint)? else {
        warn!(
            "{}: no trailing version in constraint '{constraint}' for {dependency}: skipping",
            file.path
        );
        return Ok(false);
    };

    if !released.is_newer_than(&current) {
        debug!(
            "{}: {dependency} already at {current}, released {released}: nothing to do",
            file.path
        );
        return Ok(false);
    }

    let updated = replace_trailing_version(&constraint, released)?;
    info!(
        "{}: bumping {group}.{dependency}: {constraint} -> {updated}",
        file.path
    );
    doc[*group][dependency] = json!(updated);
    file.set_document(doc)?;

    Ok(true)
}

/// Released package name: the releasing manifest's `name`, falling back to
/// the repository name.
pub fn package_name(manifest: &Value, repository: &str) -> String {
    manifest
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(repository)
        .to_string()
}
