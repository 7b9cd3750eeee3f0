//! PEP440 version grammar
//!
//! The whole grammar is one anchored, case-insensitive regular expression.
//! Matching produces a [ParsedVersion] holding the raw captures; turning
//! that into a validated [crate::domain::Version] is the caller's job.

use crate::domain::PrereleaseCategory;
use crate::error::{Result, RoboversionError};
use regex::Regex;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)
        ^v?
        (?:(?P<epoch>[0-9]+)!)?
        (?P<release>[0-9]+(?:\.[0-9]+)*)
        (?:
            [-_.]?
            (?:(?P<alpha>alpha|a)|(?P<beta>beta|b)|(?P<candidate>rc|c|preview|pre))
            [-_.]?
            (?P<pre>[0-9]+)?
        )?
        (?:
            [-_.]?(?:post|rev|r)(?P<post>[0-9]+)?
            |
            -(?P<implicit_post>[0-9]+)
        )?
        (?:[-_.]?dev(?P<dev>[0-9]+))?
        (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
        $",
    )
    .expect("PEP440 grammar is a valid regular expression")
});

/// Raw result of matching a version string against the grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    pub epoch: Option<u64>,
    pub release: Vec<u64>,
    pub prerelease: Option<(PrereleaseCategory, u64)>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    pub local: Option<String>,
}

/// Match `input` against the PEP440 grammar
///
/// # Returns
/// * `Ok(ParsedVersion)` - The captured segments
/// * `Err(MalformedVersion)` - If the whole input does not match
pub fn parse(input: &str) -> Result<ParsedVersion> {
    let malformed = || RoboversionError::MalformedVersion(input.to_string());
    let captures = VERSION_RE.captures(input).ok_or_else(malformed)?;

    // Digit runs can still overflow u64
    let number = |name: &str| -> Result<Option<u64>> {
        captures
            .name(name)
            .map(|m| m.as_str().parse::<u64>().map_err(|_| malformed()))
            .transpose()
    };

    let release = captures
        .name("release")
        .ok_or_else(malformed)?
        .as_str()
        .split('.')
        .map(|c| c.parse::<u64>().map_err(|_| malformed()))
        .collect::<Result<Vec<_>>>()?;

    let category = if captures.name("alpha").is_some() {
        Some(PrereleaseCategory::Alpha)
    } else if captures.name("beta").is_some() {
        Some(PrereleaseCategory::Beta)
    } else if captures.name("candidate").is_some() {
        Some(PrereleaseCategory::ReleaseCandidate)
    } else {
        None
    };
    let prerelease = match category {
        Some(category) => Some((category, number("pre")?.unwrap_or(0))),
        None => None,
    };

    let post = match number("post")? {
        Some(post) => Some(post),
        None => number("implicit_post")?,
    };

    Ok(ParsedVersion {
        epoch: number("epoch")?,
        release,
        prerelease,
        post,
        dev: number("dev")?,
        local: captures.name("local").map(|m| m.as_str().to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use PrereleaseCategory::*;

    fn release_of(input: &str) -> Vec<u64> {
        parse(input).unwrap().release
    }

    #[test]
    fn test_plain_release() {
        let parsed = parse("1.2.3").unwrap();
        assert_eq!(
            parsed,
            ParsedVersion {
                epoch: None,
                release: vec![1, 2, 3],
                prerelease: None,
                post: None,
                dev: None,
                local: None,
            }
        );
        assert_eq!(release_of("7"), vec![7]);
        assert_eq!(release_of("2024.10.14"), vec![2024, 10, 14]);
    }

    #[test]
    fn test_leading_v() {
        assert_eq!(release_of("v1.0"), vec![1, 0]);
        assert_eq!(release_of("V1.0"), vec![1, 0]);
    }

    #[test]
    fn test_epoch() {
        assert_eq!(parse("2!1.0").unwrap().epoch, Some(2));
        assert_eq!(parse("v1!0.1").unwrap().epoch, Some(1));
    }

    #[test]
    fn test_prerelease_spellings() {
        let cases = [
            ("1.0a1", (Alpha, 1)),
            ("1.0alpha2", (Alpha, 2)),
            ("1.0.alpha.3", (Alpha, 3)),
            ("1.0b4", (Beta, 4)),
            ("1.0-beta-5", (Beta, 5)),
            ("1.0rc6", (ReleaseCandidate, 6)),
            ("1.0c7", (ReleaseCandidate, 7)),
            ("1.0_pre8", (ReleaseCandidate, 8)),
            ("1.0preview9", (ReleaseCandidate, 9)),
            ("1.0RC1", (ReleaseCandidate, 1)),
            ("1.0ALPHA_1", (Alpha, 1)),
        ];
        for (input, expected) in cases {
            assert_eq!(parse(input).unwrap().prerelease, Some(expected), "{}", input);
        }
    }

    #[test]
    fn test_prerelease_without_number_defaults_to_zero() {
        assert_eq!(parse("1.0a").unwrap().prerelease, Some((Alpha, 0)));
        assert_eq!(parse("1.0.beta").unwrap().prerelease, Some((Beta, 0)));
        assert_eq!(parse("1.0rc").unwrap().prerelease, Some((ReleaseCandidate, 0)));
    }

    #[test]
    fn test_post_spellings() {
        assert_eq!(parse("1.0.post1").unwrap().post, Some(1));
        assert_eq!(parse("1.0post2").unwrap().post, Some(2));
        assert_eq!(parse("1.0-rev3").unwrap().post, Some(3));
        assert_eq!(parse("1.0_r4").unwrap().post, Some(4));
        assert_eq!(parse("1.0-5").unwrap().post, Some(5));
        assert_eq!(parse("1.0.post").unwrap().post, None);
    }

    #[test]
    fn test_dev() {
        assert_eq!(parse("1.0.dev3").unwrap().dev, Some(3));
        assert_eq!(parse("1.0dev3").unwrap().dev, Some(3));
        assert_eq!(parse("1.0-dev3").unwrap().dev, Some(3));
        assert!(parse("1.0.dev").is_err());
    }

    #[test]
    fn test_local() {
        assert_eq!(parse("1.0+abc123").unwrap().local.as_deref(), Some("abc123"));
        assert_eq!(
            parse("1.0+Ubuntu-1_2.x").unwrap().local.as_deref(),
            Some("Ubuntu-1_2.x")
        );
        assert!(parse("1.0+").is_err());
        assert!(parse("1.0+a..b").is_err());
    }

    #[test]
    fn test_all_segments_together() {
        let parsed = parse("v3!1.2.3rc4.post5.dev6+abc.7").unwrap();
        assert_eq!(parsed.epoch, Some(3));
        assert_eq!(parsed.release, vec![1, 2, 3]);
        assert_eq!(parsed.prerelease, Some((ReleaseCandidate, 4)));
        assert_eq!(parsed.post, Some(5));
        assert_eq!(parsed.dev, Some(6));
        assert_eq!(parsed.local.as_deref(), Some("abc.7"));
    }

    #[test]
    fn test_two_prerelease_categories_do_not_match() {
        assert!(parse("1.0a1b2").is_err());
        assert!(parse("1.0rc1.alpha2").is_err());
    }

    #[test]
    fn test_malformed_inputs() {
        for bad in ["", "v", "1.", ".1", "1..2", "1.0-", "abc", "1.0 ", " 1.0", "1.0gamma1", "x1.0"] {
            match parse(bad) {
                Err(RoboversionError::MalformedVersion(s)) => assert_eq!(s, bad),
                other => panic!("{:?} should be malformed, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_overflowing_component_is_malformed() {
        assert!(parse("99999999999999999999999.0").is_err());
    }
}
