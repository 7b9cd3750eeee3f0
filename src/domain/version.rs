use crate::domain::grammar;
use crate::domain::{LocalIdentifier, PrereleaseCategory, PrereleaseTag, ReleaseNumber};
use crate::error::{Result, RoboversionError};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// PEP440 version
///
/// Immutable once built; every bump returns a new value. A zero `post` or
/// `dev` is stored as absent, since the canonical string cannot tell the
/// two apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    epoch: u64,
    release: ReleaseNumber,
    prerelease: Option<PrereleaseTag>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<LocalIdentifier>,
}

/// Version segment targeted by [Version::get_bumped]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionField {
    Release,
    Prerelease,
    Post,
    Dev,
    Local,
}

impl Version {
    /// A final release with no other segments
    pub fn new(release: ReleaseNumber) -> Self {
        Version {
            epoch: 0,
            release,
            prerelease: None,
            post: None,
            dev: None,
            local: None,
        }
    }

    pub fn builder() -> VersionBuilder {
        VersionBuilder::default()
    }

    /// Parse a PEP440 version string (e.g., "v1.2.3rc1.dev4+abc")
    pub fn parse(s: &str) -> Result<Self> {
        let parsed = grammar::parse(s)?;

        let mut builder = Version::builder()
            .epoch(parsed.epoch.unwrap_or(0))
            .release(parsed.release);
        if let Some((category, number)) = parsed.prerelease {
            builder = builder.prerelease(PrereleaseTag::new(category, number));
        }
        if let Some(post) = parsed.post {
            builder = builder.post(post);
        }
        if let Some(dev) = parsed.dev {
            builder = builder.dev(dev);
        }
        if let Some(local) = parsed.local {
            builder = builder.local(local);
        }
        builder.build()
    }

    /// Date-based release `YYYY.M.D`, used when no tag exists
    pub fn from_date(date: NaiveDate) -> Self {
        Version::new(ReleaseNumber::from_date(date))
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn release(&self) -> &ReleaseNumber {
        &self.release
    }

    pub fn prerelease(&self) -> Option<PrereleaseTag> {
        self.prerelease
    }

    pub fn post(&self) -> Option<u64> {
        self.post
    }

    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    pub fn local(&self) -> Option<&LocalIdentifier> {
        self.local.as_ref()
    }

    /// Bump one segment of this version
    ///
    /// # Arguments
    /// * `field` - The segment to bump
    /// * `index` - Release component to bump (default: last); only valid with
    ///   [VersionField::Release]
    /// * `increment` - Amount to add (may be negative)
    ///
    /// A release bump starts a fresh version: pre-release, post, dev and
    /// local are dropped. Other bumps keep every segment except the bumped
    /// one. A missing post or dev counts as zero.
    pub fn get_bumped(
        &self,
        field: VersionField,
        index: Option<usize>,
        increment: i64,
    ) -> Result<Self> {
        if index.is_some() && field != VersionField::Release {
            return Err(RoboversionError::argument_conflict(format!(
                "a release index cannot be combined with bumping {:?}",
                field
            )));
        }

        let mut bumped = self.clone();
        match field {
            VersionField::Release => {
                bumped = Version {
                    epoch: self.epoch,
                    ..Version::new(self.release.bumped(index, increment)?)
                };
            }
            VersionField::Prerelease => {
                let prerelease = self.prerelease.ok_or(RoboversionError::NoPrereleaseSet)?;
                bumped.prerelease = Some(prerelease.bumped(increment)?);
            }
            VersionField::Post => {
                bumped.post = nonzero(bump_counter("post", self.post, increment)?);
            }
            VersionField::Dev => {
                bumped.dev = nonzero(bump_counter("dev", self.dev, increment)?);
            }
            VersionField::Local => return Err(RoboversionError::LocalNotBumpable),
        }
        Ok(bumped)
    }

    /// Compare by PEP440 precedence rather than field equality
    ///
    /// `1.0` and `1.0.0` have equal precedence. The order within one release
    /// is `.devN` < `aN` < `aN.postM` < final < `.postN`, and a `.devN`
    /// suffix sorts before the same version without it.
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.release.significant().cmp(other.release.significant()))
            .then_with(|| self.phase_key().cmp(&other.phase_key()))
            .then_with(|| self.post.is_some().cmp(&other.post.is_some()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| other.dev.is_some().cmp(&self.dev.is_some()))
            .then_with(|| self.dev.cmp(&other.dev))
            .then_with(|| match (&self.local, &other.local) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (Some(a), Some(b)) => a.cmp_precedence(b),
            })
    }

    // (rank, category, number): dev-only releases first, then pre-releases, then final
    fn phase_key(&self) -> (u8, Option<PrereleaseCategory>, u64) {
        match (self.prerelease, self.post, self.dev) {
            (Some(pre), _, _) => (1, Some(pre.category), pre.number),
            (None, None, Some(_)) => (0, None, 0),
            (None, _, _) => (2, None, 0),
        }
    }
}

fn bump_counter(name: &str, value: Option<u64>, increment: i64) -> Result<u64> {
    let current = value.unwrap_or(0);
    current.checked_add_signed(increment).ok_or_else(|| {
        RoboversionError::invalid_field(format!(
            "bumping {} {} by {} leaves the valid range",
            name, current, increment
        ))
    })
}

fn nonzero(value: u64) -> Option<u64> {
    (value != 0).then_some(value)
}

impl FromStr for Version {
    type Err = RoboversionError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        write!(f, "{}", self.release)?;
        if let Some(prerelease) = &self.prerelease {
            write!(f, "{}", prerelease)?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{}", post)?;
        }
        if let Some(dev) = self.dev {
            write!(f, ".dev{}", dev)?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{}", local)?;
        }
        Ok(())
    }
}

/// Field-by-field construction of a [Version] with validation deferred to
/// [VersionBuilder::build]
#[derive(Debug, Clone, Default)]
pub struct VersionBuilder {
    epoch: u64,
    release: Vec<u64>,
    prereleases: Vec<PrereleaseTag>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<String>,
}

impl VersionBuilder {
    pub fn epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    pub fn release(mut self, components: impl Into<Vec<u64>>) -> Self {
        self.release = components.into();
        self
    }

    pub fn prerelease(mut self, tag: PrereleaseTag) -> Self {
        self.prereleases.push(tag);
        self
    }

    pub fn alpha(self, number: u64) -> Self {
        self.prerelease(PrereleaseTag::new(PrereleaseCategory::Alpha, number))
    }

    pub fn beta(self, number: u64) -> Self {
        self.prerelease(PrereleaseTag::new(PrereleaseCategory::Beta, number))
    }

    pub fn candidate(self, number: u64) -> Self {
        self.prerelease(PrereleaseTag::new(PrereleaseCategory::ReleaseCandidate, number))
    }

    pub fn post(mut self, post: u64) -> Self {
        self.post = Some(post);
        self
    }

    pub fn dev(mut self, dev: u64) -> Self {
        self.dev = Some(dev);
        self
    }

    pub fn local(mut self, local: impl Into<String>) -> Self {
        self.local = Some(local.into());
        self
    }

    /// Validate the collected fields
    ///
    /// # Returns
    /// * `Err(InvalidField)` - If no release components were given
    /// * `Err(ConflictingPrerelease)` - If more than one pre-release was given
    /// * `Err(InvalidLocal)` - If the local identifier is malformed
    pub fn build(self) -> Result<Version> {
        let release = ReleaseNumber::new(self.release)?;
        if self.prereleases.len() > 1 {
            return Err(RoboversionError::ConflictingPrerelease);
        }
        let local = self.local.as_deref().map(LocalIdentifier::parse).transpose()?;

        Ok(Version {
            epoch: self.epoch,
            release,
            prerelease: self.prereleases.first().copied(),
            post: self.post.and_then(nonzero),
            dev: self.dev.and_then(nonzero),
            local,
        })
    }
}
