use crate::git::HistoryPoint;
use std::cell::RefCell;
use std::fmt;

/// Warnings that occur when a target sits at an awkward place in history.
/// These are non-fatal: resolution still produces a version.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionWarning {
    /// The target has no commits beyond the open stream branch: it lies in
    /// that branch's history without being its tip
    BehindOpenStream {
        target: HistoryPoint,
        stream_branch: String,
    },
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionWarning::BehindOpenStream {
                target,
                stream_branch,
            } => write!(
                f,
                "'{}' is in the history of upstream prerelease branch '{}'; \
                 reporting a local version only",
                target, stream_branch
            ),
        }
    }
}

/// Observer for non-fatal resolution diagnostics
pub trait Diagnostics {
    fn warn(&self, warning: &ResolutionWarning);
}

/// Forwards warnings to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, warning: &ResolutionWarning) {
        tracing::warn!("{}", warning);
    }
}

/// Keeps every warning it receives, for inspection afterwards
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    warnings: RefCell<Vec<ResolutionWarning>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<ResolutionWarning> {
        self.warnings.borrow().clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn warn(&self, warning: &ResolutionWarning) {
        self.warnings.borrow_mut().push(warning.clone());
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn warn(&self, warning: &ResolutionWarning) {
        (**self).warn(warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = ResolutionWarning::BehindOpenStream {
            target: HistoryPoint::new("feature"),
            stream_branch: "develop".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("'feature'"));
        assert!(msg.contains("'develop'"));
    }

    #[test]
    fn test_recording_diagnostics() {
        let diagnostics = RecordingDiagnostics::new();
        let warning = ResolutionWarning::BehindOpenStream {
            target: HistoryPoint::new("HEAD"),
            stream_branch: "alpha".to_string(),
        };
        (&diagnostics).warn(&warning);
        assert_eq!(diagnostics.warnings(), vec![warning]);
    }
}
