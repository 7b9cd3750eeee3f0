use crate::error::{Result, RoboversionError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Local version identifier (the part after `+`)
///
/// Stored in normalized form: lowercase, with `-` and `_` separators
/// replaced by `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocalIdentifier {
    normalized: String,
}

impl LocalIdentifier {
    /// Validate and normalize a local identifier
    ///
    /// Segments must be non-empty and ASCII alphanumeric; `.`, `-` and `_`
    /// separate them.
    pub fn parse(s: &str) -> Result<Self> {
        let segments: Vec<&str> = s.split(['.', '-', '_']).collect();
        let valid = segments
            .iter()
            .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_alphanumeric()));
        if !valid {
            return Err(RoboversionError::InvalidLocal(s.to_string()));
        }

        Ok(LocalIdentifier {
            normalized: segments.join(".").to_ascii_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.normalized.split('.')
    }

    /// PEP440 local ordering: segment by segment, numeric segments compare
    /// numerically and sort above alphanumeric ones; a longer identifier
    /// sorts above its prefix
    pub(crate) fn cmp_precedence(&self, other: &Self) -> Ordering {
        let mut lhs = self.segments();
        let mut rhs = other.segments();
        loop {
            match (lhs.next(), rhs.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(a), Some(b)) => {
                    let ordering = match (a.parse::<u64>(), b.parse::<u64>()) {
                        (Ok(x), Ok(y)) => x.cmp(&y),
                        (Ok(_), Err(_)) => Ordering::Greater,
                        (Err(_), Ok(_)) => Ordering::Less,
                        (Err(_), Err(_)) => a.cmp(b),
                    };
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                }
            }
        }
    }
}

impl FromStr for LocalIdentifier {
    type Err = RoboversionError;

    fn from_str(s: &str) -> Result<Self> {
        LocalIdentifier::parse(s)
    }
}

impl fmt::Display for LocalIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.normalized)
    }
}
