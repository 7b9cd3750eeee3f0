use crate::domain::Version;
use crate::error::{Result, RoboversionError};
use crate::git::{HistoryPoint, HistoryProvider, TagDescription};
use git2::{Oid, Repository as Git2Repo, Sort};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// History queries backed by a git2 repository
pub struct Git2History {
    repo: Git2Repo,
}

impl Git2History {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2History { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2History { repo }
    }

    fn commit_oid(&self, point: &HistoryPoint) -> Result<Oid> {
        let object = self.repo.revparse_single(point.as_str()).map_err(|e| {
            RoboversionError::history(format!("Cannot resolve '{}': {}", point, e))
        })?;
        let commit = object.peel_to_commit().map_err(|e| {
            RoboversionError::history(format!("'{}' does not name a commit: {}", point, e))
        })?;
        Ok(commit.id())
    }

    fn count_commits(&self, from: Oid, hide: Option<Oid>) -> Result<u64> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.push(from)?;
        if let Some(hide) = hide {
            revwalk.hide(hide)?;
        }

        let mut count = 0;
        for oid_result in revwalk {
            oid_result?;
            count += 1;
        }
        Ok(count)
    }

    /// Tags that name PEP440 versions, keyed by the commit they point at
    ///
    /// When a commit carries several version tags, only the one with the
    /// highest precedence is kept.
    fn version_tags(&self) -> Result<HashMap<Oid, (String, Version)>> {
        let names = self.repo.tag_names(None)?;
        let mut tags: HashMap<Oid, (String, Version)> = HashMap::new();

        for name in names.iter().flatten() {
            let version = match Version::parse(name) {
                Ok(version) => version,
                Err(_) => {
                    debug!(tag = name, "skipping tag that is not a PEP440 version");
                    continue;
                }
            };

            let reference_name = format!("refs/tags/{}", name);
            let commit = self
                .repo
                .find_reference(&reference_name)
                .and_then(|reference| reference.peel_to_commit());
            let oid = match commit {
                Ok(commit) => commit.id(),
                Err(e) => {
                    debug!(tag = name, error = %e, "skipping tag that does not point at a commit");
                    continue;
                }
            };

            let replace = match tags.get(&oid) {
                None => true,
                Some((_, existing)) => version.cmp_precedence(existing) == Ordering::Greater,
            };
            if replace {
                tags.insert(oid, (name.to_string(), version));
            }
        }

        Ok(tags)
    }

    /// Tagged commits reachable from `target` that are not ancestors of
    /// another reachable tagged commit
    ///
    /// A tagged ancestor of a tagged commit is always farther from the
    /// target, so only these can be nearest.
    fn nearest_tagged_commits(
        &self,
        target: Oid,
        tags: &HashMap<Oid, (String, Version)>,
    ) -> Result<Vec<Oid>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL)?;
        revwalk.push(target)?;

        let mut nearest: Vec<Oid> = Vec::new();
        for oid_result in revwalk {
            let oid = oid_result?;
            if !tags.contains_key(&oid) {
                continue;
            }
            let mut shadowed = false;
            for kept in &nearest {
                if self.repo.graph_descendant_of(*kept, oid)? {
                    shadowed = true;
                    break;
                }
            }
            if !shadowed {
                nearest.push(oid);
            }
        }

        Ok(nearest)
    }
}

impl HistoryProvider for Git2History {
    fn resolve_branch_name(&self, point: &HistoryPoint) -> Result<String> {
        let (_, reference) = self.repo.revparse_ext(point.as_str()).map_err(|e| {
            RoboversionError::history(format!("Cannot resolve '{}': {}", point, e))
        })?;

        let Some(reference) = reference else {
            return Ok(point.as_str().to_string());
        };
        let resolved = reference.resolve()?;
        let name = resolved
            .shorthand()
            .ok_or_else(|| RoboversionError::history(format!("Ref '{}' is not valid UTF-8", point)))?;

        Ok(name.to_string())
    }

    fn commits_since(&self, point: &HistoryPoint, since: Option<&HistoryPoint>) -> Result<u64> {
        let from = self.commit_oid(point)?;
        let hide = since.map(|since| self.commit_oid(since)).transpose()?;
        self.count_commits(from, hide)
    }

    fn describe_from_tag(&self, point: &HistoryPoint) -> Result<TagDescription> {
        let target = self.commit_oid(point)?;
        let mut tags = self.version_tags()?;
        let mut nearest: Option<(u64, String, Version, Oid)> = None;

        for tag_oid in self.nearest_tagged_commits(target, &tags)? {
            let Some((name, version)) = tags.remove(&tag_oid) else {
                continue;
            };
            let distance = self.count_commits(target, Some(tag_oid))?;

            let closer = match &nearest {
                None => true,
                Some((best, _, best_version, _)) => {
                    distance < *best
                        || (distance == *best
                            && version.cmp_precedence(best_version) == Ordering::Greater)
                }
            };
            if closer {
                nearest = Some((distance, name, version, tag_oid));
            }
        }

        Ok(match nearest {
            Some((distance, name, version, tag_oid)) => {
                debug!(tag = %name, distance, "found nearest version tag");
                TagDescription::Found {
                    distance: (distance > 0).then_some(distance),
                    version,
                    tag_point: HistoryPoint::new(tag_oid.to_string()),
                }
            }
            None => TagDescription::NotFound,
        })
    }

    fn abbreviated_id(&self, point: &HistoryPoint) -> Result<String> {
        let oid = self.commit_oid(point)?;
        let object = self.repo.find_object(oid, None)?;
        let short = object.short_id()?;

        short
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| RoboversionError::history("Abbreviated commit id is not valid UTF-8"))
    }
}
