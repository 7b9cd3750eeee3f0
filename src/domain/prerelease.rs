//! Pre-release segment handling for PEP440 versions
//!
//! A PEP440 pre-release is one of three ordered categories (alpha, beta,
//! release candidate) followed by a counter, serialized as `a1`, `b2` or
//! `rc3`. See https://peps.python.org/pep-0440/#pre-releases

use crate::error::{Result, RoboversionError};
use std::fmt;
use std::str::FromStr;

/// Pre-release category, ordered from least to most mature
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrereleaseCategory {
    /// Alpha pre-release
    Alpha,
    /// Beta pre-release
    Beta,
    /// Release candidate
    ReleaseCandidate,
}

impl PrereleaseCategory {
    /// Canonical PEP440 prefix for this category
    pub fn prefix(&self) -> &'static str {
        match self {
            PrereleaseCategory::Alpha => "a",
            PrereleaseCategory::Beta => "b",
            PrereleaseCategory::ReleaseCandidate => "rc",
        }
    }
}

impl FromStr for PrereleaseCategory {
    type Err = RoboversionError;

    /// Accepts every spelling PEP440 permits: "a", "alpha", "b", "beta",
    /// "rc", "c", "pre" and "preview"
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "a" | "alpha" => Ok(PrereleaseCategory::Alpha),
            "b" | "beta" => Ok(PrereleaseCategory::Beta),
            "rc" | "c" | "pre" | "preview" => Ok(PrereleaseCategory::ReleaseCandidate),
            _ => Err(RoboversionError::invalid_field(format!(
                "Invalid pre-release category: '{}'",
                s
            ))),
        }
    }
}

impl fmt::Display for PrereleaseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// Pre-release segment: a category paired with a counter
///
/// # Examples
/// - "a0" -> PrereleaseTag { category: Alpha, number: 0 }
/// - "rc3" -> PrereleaseTag { category: ReleaseCandidate, number: 3 }
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrereleaseTag {
    pub category: PrereleaseCategory,
    pub number: u64,
}

impl PrereleaseTag {
    pub fn new(category: PrereleaseCategory, number: u64) -> Self {
        PrereleaseTag { category, number }
    }

    /// Same category, counter moved by `increment`
    pub fn bumped(&self, increment: i64) -> Result<Self> {
        let number = self.number.checked_add_signed(increment).ok_or_else(|| {
            RoboversionError::invalid_field(format!(
                "bumping pre-release {} by {} leaves the valid range",
                self, increment
            ))
        })?;
        Ok(PrereleaseTag {
            category: self.category,
            number,
        })
    }
}

impl fmt::Display for PrereleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.category, self.number)
    }
}
