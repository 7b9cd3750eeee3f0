//! Domain logic - the PEP440 version model, independent of git operations

pub mod grammar;
pub mod local;
pub mod prerelease;
pub mod release;
pub mod version;

pub use local::LocalIdentifier;
pub use prerelease::{PrereleaseCategory, PrereleaseTag};
pub use release::ReleaseNumber;
pub use version::{Version, VersionBuilder, VersionField};
