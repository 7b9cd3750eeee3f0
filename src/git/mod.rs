//! Git history abstraction layer
//!
//! This module provides a trait-based abstraction over the handful of
//! history queries that version resolution needs, allowing for a real
//! repository implementation and a mock implementation for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [HistoryProvider] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2History]: A real implementation using the `git2` crate
//! - [mock::MockHistory]: Canned responses for testing
//!
//! # Usage
//!
//! Resolution code depends on the [HistoryProvider] trait rather than on a
//! concrete implementation.
//!
//! ```rust
//! # use roboversion::git::{HistoryPoint, HistoryProvider};
//! # fn example<H: HistoryProvider>(history: &H) -> roboversion::Result<()> {
//! let head = HistoryPoint::new("HEAD");
//! let total = history.commits_since(&head, None)?;
//! let ahead_of_develop = history.commits_since(&head, Some(&HistoryPoint::new("develop")))?;
//! assert!(total >= ahead_of_develop);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockHistory;
pub use repository::Git2History;

use crate::domain::Version;
use crate::error::Result;
use std::fmt;

/// Opaque handle to a position in history (a ref name or commit id)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HistoryPoint(String);

impl HistoryPoint {
    pub fn new(rev: impl Into<String>) -> Self {
        HistoryPoint(rev.into())
    }

    /// The revision string this point was created from
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HistoryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for HistoryPoint {
    fn from(rev: &str) -> Self {
        HistoryPoint::new(rev)
    }
}

impl From<String> for HistoryPoint {
    fn from(rev: String) -> Self {
        HistoryPoint(rev)
    }
}

/// Result of looking for the nearest PEP440 tag behind a point
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagDescription {
    /// A tagged version was found
    Found {
        /// Commits after the tag up to the point; `None` if the point is the
        /// tagged commit itself
        distance: Option<u64>,
        /// The version the tag names
        version: Version,
        /// The tagged commit
        tag_point: HistoryPoint,
    },
    /// No PEP440 tag is reachable from the point
    NotFound,
}

/// History queries consumed by the resolver
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations should map
/// their underlying failures to [crate::error::RoboversionError::Git] or
/// [crate::error::RoboversionError::History]. "No tag reachable" is not an
/// error; it is reported as [TagDescription::NotFound].
///
/// ## Implementations
///
/// - [Git2History](repository::Git2History): Real Git implementation using the `git2` crate
/// - [MockHistory](mock::MockHistory): Test implementation with canned answers
pub trait HistoryProvider {
    /// Name of the branch checked out at `point`
    ///
    /// Symbolic refs resolve to the branch they point at (`HEAD` -> `main`);
    /// a point that is not a ref is returned as given.
    fn resolve_branch_name(&self, point: &HistoryPoint) -> Result<String>;

    /// Count commits in the history of `point` that are not in the history
    /// of `since`
    ///
    /// With `since = None` this is the total number of commits reachable
    /// from `point`.
    fn commits_since(&self, point: &HistoryPoint, since: Option<&HistoryPoint>) -> Result<u64>;

    /// Find the nearest PEP440-compliant tag at or behind `point`
    ///
    /// Tags whose names are not valid PEP440 versions are skipped.
    fn describe_from_tag(&self, point: &HistoryPoint) -> Result<TagDescription>;

    /// Short, unique, hex identifier of the commit at `point`
    fn abbreviated_id(&self, point: &HistoryPoint) -> Result<String>;
}
