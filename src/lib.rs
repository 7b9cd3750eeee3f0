//! PEP440 versions computed from git history.
//!
//! Release versions come from tags that name PEP440 versions. Prerelease
//! stream branches (alpha, beta, release candidate) can be configured so
//! commits on or past them get prerelease versions; other commits get
//! development versions, locally versioned by their abbreviated hash.

pub mod boundary;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod resolver;
pub mod ui;

pub use domain::{LocalIdentifier, PrereleaseCategory, PrereleaseTag, ReleaseNumber, Version};
pub use error::{Result, RoboversionError};
pub use resolver::{LocalPolicy, ResolveOptions, Resolver, StreamBranches};

use git::{Git2History, HistoryPoint};
use std::path::Path;

/// Resolve the version of `target_ref` in the repository at
/// `repository_path`.
///
/// Warnings are reported through `tracing`.
pub fn get_version(
    repository_path: impl AsRef<Path>,
    target_ref: &str,
    options: &ResolveOptions,
) -> Result<Version> {
    let history = Git2History::open(repository_path)?;
    Resolver::new(&history).resolve(&HistoryPoint::new(target_ref), options)
}
