//! Version resolution from a point's position in history
//!
//! The resolver combines the nearest PEP440 tag with the target's position
//! relative to the configured prerelease stream branches:
//! - at a tag: the tagged version
//! - at a stream branch tip: the next release with that stream's prerelease,
//!   numbered by the distance from the tag
//! - past the least mature stream: the next prerelease of that stream plus a
//!   dev counter
//! - no streams: the next release with a dev counter

use crate::boundary::{Diagnostics, ResolutionWarning, TracingDiagnostics};
use crate::domain::{LocalIdentifier, PrereleaseCategory, PrereleaseTag, Version};
use crate::error::Result;
use crate::git::{HistoryPoint, HistoryProvider, TagDescription};
use chrono::{NaiveDate, Utc};
use tracing::debug;

/// Branch names of the prerelease streams, any of which may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamBranches {
    pub alpha: Option<String>,
    pub beta: Option<String>,
    pub candidate: Option<String>,
}

impl StreamBranches {
    /// Configured streams from most to least mature
    fn by_maturity(&self) -> impl Iterator<Item = (PrereleaseCategory, &str)> {
        [
            (PrereleaseCategory::ReleaseCandidate, &self.candidate),
            (PrereleaseCategory::Beta, &self.beta),
            (PrereleaseCategory::Alpha, &self.alpha),
        ]
        .into_iter()
        .filter_map(|(category, branch)| branch.as_deref().map(|b| (category, b)))
    }

    /// The least mature configured stream
    fn open_stream(&self) -> Option<(PrereleaseCategory, &str)> {
        self.by_maturity().last()
    }
}

/// How the local version segment is chosen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LocalPolicy {
    /// Use the abbreviated commit id of the target
    #[default]
    Auto,
    /// Use this identifier
    Explicit(LocalIdentifier),
    /// Leave the local segment off
    Suppressed,
}

/// Caller-supplied inputs to a resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub streams: StreamBranches,
    /// Post-release number; replaces any dev counter
    pub post: Option<u64>,
    pub local: LocalPolicy,
}

/// Computes the [Version] of a history point
pub struct Resolver<'a, H: HistoryProvider, D: Diagnostics = TracingDiagnostics> {
    history: &'a H,
    diagnostics: D,
    today: Option<NaiveDate>,
}

impl<'a, H: HistoryProvider> Resolver<'a, H> {
    /// Create a resolver that reports warnings through `tracing`
    pub fn new(history: &'a H) -> Self {
        Resolver {
            history,
            diagnostics: TracingDiagnostics,
            today: None,
        }
    }
}

impl<'a, H: HistoryProvider, D: Diagnostics> Resolver<'a, H, D> {
    /// Replace the diagnostics observer
    pub fn with_diagnostics<E: Diagnostics>(self, diagnostics: E) -> Resolver<'a, H, E> {
        Resolver {
            history: self.history,
            diagnostics,
            today: self.today,
        }
    }

    /// Fix the date used for the date-based fallback version
    pub fn with_date(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Resolve the version of `target`
    ///
    /// # Returns
    /// * `Ok(Version)` - The resolved version
    /// * `Err` - Any failure from the history provider, unchanged
    pub fn resolve(&self, target: &HistoryPoint, options: &ResolveOptions) -> Result<Version> {
        let (distance, tagged, tag_point) = match self.history.describe_from_tag(target)? {
            TagDescription::Found {
                distance,
                version,
                tag_point,
            } => (distance, version, Some(tag_point)),
            TagDescription::NotFound => {
                let today = self.today.unwrap_or_else(|| Utc::now().date_naive());
                let total = self.history.commits_since(target, None)?;
                debug!(%target, total, %today, "no version tag found; using date-based release");
                (Some(total), Version::from_date(today), None)
            }
        };

        let Some(distance) = distance else {
            debug!(%target, version = %tagged, "target is a tagged version");
            return Ok(tagged);
        };

        let next_release = tagged.release().bumped(None, 1)?;

        let streams = &options.streams;
        if streams.by_maturity().next().is_some() {
            let branch_name = self.history.resolve_branch_name(target)?;
            for (category, stream_branch) in streams.by_maturity() {
                if branch_name == stream_branch {
                    debug!(%target, stream_branch, distance, "target is a stream branch tip");
                    return Version::builder()
                        .epoch(tagged.epoch())
                        .release(next_release.components().to_vec())
                        .prerelease(PrereleaseTag::new(category, distance))
                        .build();
                }
            }
        }

        let (prerelease, dev) = match streams.open_stream() {
            Some((category, stream_branch)) => {
                let stream_point = HistoryPoint::new(stream_branch);
                let since_branch = self.history.commits_since(target, Some(&stream_point))?;

                if since_branch == 0 {
                    self.diagnostics.warn(&ResolutionWarning::BehindOpenStream {
                        target: target.clone(),
                        stream_branch: stream_branch.to_string(),
                    });
                    return Version::builder()
                        .epoch(tagged.epoch())
                        .release(tagged.release().components().to_vec())
                        .local(self.history.abbreviated_id(target)?)
                        .build();
                }

                let since_upstream = self
                    .history
                    .commits_since(&stream_point, tag_point.as_ref())?;
                debug!(%target, stream_branch, since_branch, since_upstream, "target is past the open stream");
                (
                    Some(PrereleaseTag::new(category, since_upstream + 1)),
                    since_branch,
                )
            }
            None => (None, distance),
        };

        let mut builder = Version::builder()
            .epoch(tagged.epoch())
            .release(next_release.components().to_vec());
        if let Some(prerelease) = prerelease {
            builder = builder.prerelease(prerelease);
        }
        builder = match options.post {
            Some(post) => builder.post(post),
            None => builder.dev(dev),
        };

        match &options.local {
            LocalPolicy::Auto => builder = builder.local(self.history.abbreviated_id(target)?),
            LocalPolicy::Explicit(local) => builder = builder.local(local.as_str()),
            LocalPolicy::Suppressed => {}
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::RecordingDiagnostics;
    use crate::git::MockHistory;

    fn found(distance: Option<u64>, version: &str, tag_point: &str) -> TagDescription {
        TagDescription::Found {
            distance,
            version: Version::parse(version).unwrap(),
            tag_point: HistoryPoint::new(tag_point),
        }
    }

    #[test]
    fn test_stream_order_is_most_mature_first() {
        let streams = StreamBranches {
            alpha: Some("develop".to_string()),
            beta: None,
            candidate: Some("release".to_string()),
        };
        let order: Vec<_> = streams.by_maturity().collect();
        assert_eq!(
            order,
            vec![
                (PrereleaseCategory::ReleaseCandidate, "release"),
                (PrereleaseCategory::Alpha, "develop"),
            ]
        );
        assert_eq!(streams.open_stream(), Some((PrereleaseCategory::Alpha, "develop")));
    }

    #[test]
    fn test_open_stream_falls_back_to_beta_then_candidate() {
        let streams = StreamBranches {
            alpha: None,
            beta: Some("beta".to_string()),
            candidate: Some("rc".to_string()),
        };
        assert_eq!(streams.open_stream(), Some((PrereleaseCategory::Beta, "beta")));

        let streams = StreamBranches {
            candidate: Some("rc".to_string()),
            ..StreamBranches::default()
        };
        assert_eq!(
            streams.open_stream(),
            Some((PrereleaseCategory::ReleaseCandidate, "rc"))
        );
        assert_eq!(StreamBranches::default().open_stream(), None);
    }

    #[test]
    fn test_explicit_local_overrides_abbreviated_id() {
        let mut history = MockHistory::new();
        history.set_description("HEAD", found(Some(5), "1.2.3", "t0"));

        let options = ResolveOptions {
            local: LocalPolicy::Explicit(LocalIdentifier::parse("ci-42").unwrap()),
            ..ResolveOptions::default()
        };
        let version = Resolver::new(&history)
            .resolve(&HistoryPoint::new("HEAD"), &options)
            .unwrap();
        assert_eq!(version.to_string(), "1.2.4.dev5+ci.42");
    }

    #[test]
    fn test_behind_open_stream_ignores_explicit_local() {
        let mut history = MockHistory::new();
        history.set_description("old", found(Some(1), "1.0.0", "t0"));
        history.set_branch_name("old", "old");
        history.set_commits_since("old", Some("develop"), 0);
        history.set_abbreviated_id("old", "a1b2c3d");

        let diagnostics = RecordingDiagnostics::new();
        let options = ResolveOptions {
            streams: StreamBranches {
                alpha: Some("develop".to_string()),
                ..StreamBranches::default()
            },
            local: LocalPolicy::Explicit(LocalIdentifier::parse("mine").unwrap()),
            ..ResolveOptions::default()
        };
        let version = Resolver::new(&history)
            .with_diagnostics(&diagnostics)
            .resolve(&HistoryPoint::new("old"), &options)
            .unwrap();
        assert_eq!(version.to_string(), "1.0.0+a1b2c3d");
        assert_eq!(diagnostics.warnings().len(), 1);
    }
}
