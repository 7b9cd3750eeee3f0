use crate::error::{Result, RoboversionError};
use crate::git::{HistoryPoint, HistoryProvider, TagDescription};
use std::collections::HashMap;

/// Mock history for testing without an actual repository
///
/// Every query answers from a table filled in by the test. A query with no
/// configured answer fails with a history-access error, so a test notices
/// when resolution asks something unexpected.
pub struct MockHistory {
    branch_names: HashMap<HistoryPoint, String>,
    commit_counts: HashMap<(HistoryPoint, Option<HistoryPoint>), u64>,
    descriptions: HashMap<HistoryPoint, TagDescription>,
    abbreviated_ids: HashMap<HistoryPoint, String>,
    failure: Option<String>,
}

impl MockHistory {
    /// Create a new empty mock history
    pub fn new() -> Self {
        MockHistory {
            branch_names: HashMap::new(),
            commit_counts: HashMap::new(),
            descriptions: HashMap::new(),
            abbreviated_ids: HashMap::new(),
            failure: None,
        }
    }

    /// Set the branch name reported for a point
    pub fn set_branch_name(&mut self, point: impl Into<HistoryPoint>, name: impl Into<String>) {
        self.branch_names.insert(point.into(), name.into());
    }

    /// Set the commit count between a point and an optional base
    pub fn set_commits_since(
        &mut self,
        point: impl Into<HistoryPoint>,
        since: Option<&str>,
        count: u64,
    ) {
        self.commit_counts
            .insert((point.into(), since.map(HistoryPoint::from)), count);
    }

    /// Set the tag description reported for a point
    pub fn set_description(&mut self, point: impl Into<HistoryPoint>, description: TagDescription) {
        self.descriptions.insert(point.into(), description);
    }

    /// Set the abbreviated commit id of a point
    pub fn set_abbreviated_id(&mut self, point: impl Into<HistoryPoint>, id: impl Into<String>) {
        self.abbreviated_ids.insert(point.into(), id.into());
    }

    /// Make every query fail with the given message
    pub fn fail_with(&mut self, message: impl Into<String>) {
        self.failure = Some(message.into());
    }

    fn check_failure(&self) -> Result<()> {
        match &self.failure {
            Some(message) => Err(RoboversionError::history(message.clone())),
            None => Ok(()),
        }
    }

    fn missing(query: &str, point: &HistoryPoint) -> RoboversionError {
        RoboversionError::history(format!("no {} configured for '{}'", query, point))
    }
}

impl Default for MockHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryProvider for MockHistory {
    fn resolve_branch_name(&self, point: &HistoryPoint) -> Result<String> {
        self.check_failure()?;
        self.branch_names
            .get(point)
            .cloned()
            .ok_or_else(|| Self::missing("branch name", point))
    }

    fn commits_since(&self, point: &HistoryPoint, since: Option<&HistoryPoint>) -> Result<u64> {
        self.check_failure()?;
        self.commit_counts
            .get(&(point.clone(), since.cloned()))
            .copied()
            .ok_or_else(|| Self::missing("commit count", point))
    }

    fn describe_from_tag(&self, point: &HistoryPoint) -> Result<TagDescription> {
        self.check_failure()?;
        self.descriptions
            .get(point)
            .cloned()
            .ok_or_else(|| Self::missing("tag description", point))
    }

    fn abbreviated_id(&self, point: &HistoryPoint) -> Result<String> {
        self.check_failure()?;
        self.abbreviated_ids
            .get(point)
            .cloned()
            .ok_or_else(|| Self::missing("abbreviated id", point))
    }
}
