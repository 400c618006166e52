//! Dependency version bumps for package.json and npm-shrinkwrap.json.
//!
//! Everything here is pure: functions take decoded [`file::RemoteFile`]
//! handles, mutate them in place and report whether anything changed.
pub mod file;
pub mod lockfile;
pub mod manifest;
pub mod version;
