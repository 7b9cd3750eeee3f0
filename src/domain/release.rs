use crate::error::{Result, RoboversionError};
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// Furthest a bump may pad a release past its last component
const MAX_PADDING: usize = 16;

/// The dot-separated numeric release segment of a version (e.g. `1.2.3`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseNumber {
    components: Vec<u64>,
}

impl ReleaseNumber {
    /// Create a release number from its components
    ///
    /// # Returns
    /// * `Ok(ReleaseNumber)` - If at least one component was given
    /// * `Err` - If `components` is empty
    pub fn new(components: impl Into<Vec<u64>>) -> Result<Self> {
        let components = components.into();
        if components.is_empty() {
            return Err(RoboversionError::invalid_field(
                "release components cannot be empty",
            ));
        }
        Ok(ReleaseNumber { components })
    }

    /// `year.month.day`
    pub fn from_date(date: NaiveDate) -> Self {
        ReleaseNumber {
            components: vec![
                u64::from(date.year().unsigned_abs()),
                u64::from(date.month()),
                u64::from(date.day()),
            ],
        }
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Always false; a release number has at least one component
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Bump the component at `index` (default: the last one) by `increment`
    ///
    /// Components after `index` are zeroed. If `index` lies beyond the end,
    /// the release is zero-padded up to it first. The result never has fewer
    /// components than the original. An index more than a few components past
    /// the end is rejected.
    ///
    /// # Examples
    /// - `1.2.3` bumped with no index -> `1.2.4`
    /// - `1.2.3` bumped at index 0 -> `2.0.0`
    /// - `1.2` bumped at index 3 -> `1.2.0.1`
    pub fn bumped(&self, index: Option<usize>, increment: i64) -> Result<Self> {
        let index = index.unwrap_or(self.components.len() - 1);
        if index >= self.components.len() + MAX_PADDING {
            return Err(RoboversionError::invalid_field(format!(
                "release index {} is out of range for {}",
                index, self
            )));
        }
        let width = self.components.len().max(index + 1);

        let mut components: Vec<u64> = self
            .components
            .iter()
            .copied()
            .take(index)
            .chain(std::iter::repeat(0))
            .take(width)
            .collect();

        let current = self.components.get(index).copied().unwrap_or(0);
        components[index] = current.checked_add_signed(increment).ok_or_else(|| {
            RoboversionError::invalid_field(format!(
                "bumping release component {} ({}) by {} leaves the valid range",
                index, current, increment
            ))
        })?;

        Ok(ReleaseNumber { components })
    }

    /// Components with trailing zeros removed, for precedence comparison
    pub(crate) fn significant(&self) -> &[u64] {
        let end = self
            .components
            .iter()
            .rposition(|&c| c != 0)
            .map_or(0, |i| i + 1);
        &self.components[..end]
    }
}

impl fmt::Display for ReleaseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}
