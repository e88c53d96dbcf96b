//! Dotted version comparison.
//!
//! Two parsers are provided. The lenient one mirrors what deployed clients
//! have always been judged by: every segment is read like a base-10
//! `parseInt`, and a segment without leading digits is "not-a-number",
//! which compares equal to anything. The strict one rejects anything that
//! isn't one to three plain decimal components.
//!
//! Only the first three positions (major, minor, patch) are ever compared.
//! Missing trailing components count as zero.
//!
//! Lenient components are IEEE doubles, exactly as `parseInt` yields them:
//! digits beyond 2^53 round to the nearest representable value, so
//! `9007199254740993` and `9007199254740992` compare equal, and a run of
//! digits too long for a double becomes infinity.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Number of compared positions.
const COMPONENTS: usize = 3;

/// Compare two dotted version strings with the lenient parser.
///
/// Never fails. A position where either side is not-a-number is treated
/// as equal and comparison falls through to the next position.
pub fn compare(a: &str, b: &str) -> Ordering {
    LenientVersion::parse(a).compare(&LenientVersion::parse(b))
}

/// Compare two dotted version strings with the strict parser.
pub fn compare_strict(a: &str, b: &str) -> Result<Ordering> {
    let a: Version = a.parse()?;
    let b: Version = b.parse()?;
    Ok(a.cmp(&b))
}

/// How version strings are parsed before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionParsing {
    /// Accept anything; unparseable segments compare equal.
    #[default]
    Lenient,
    /// Reject malformed versions with [`Error::InvalidVersion`].
    Strict,
}

impl VersionParsing {
    /// Compare `a` against `b` using this parsing mode.
    ///
    /// Lenient comparison always succeeds.
    pub fn compare(self, a: &str, b: &str) -> Result<Ordering> {
        match self {
            Self::Lenient => Ok(compare(a, b)),
            Self::Strict => compare_strict(a, b),
        }
    }

    /// Check that `version` is acceptable under this mode.
    pub fn validate(self, version: &str) -> Result<()> {
        match self {
            Self::Lenient => Ok(()),
            Self::Strict => version.parse::<Version>().map(|_| ()),
        }
    }
}

/// A version parsed with `parseInt` semantics per component.
///
/// `None` marks a not-a-number component. No `PartialOrd`: not-a-number
/// positions make the relation non-transitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LenientVersion {
    parts: [Option<f64>; COMPONENTS],
}

impl LenientVersion {
    pub fn parse(s: &str) -> Self {
        let mut segments = s.split('.');
        let mut parts = [Some(0.0); COMPONENTS];
        for part in &mut parts {
            match segments.next() {
                Some(segment) => *part = parse_int_prefix(segment),
                None => break,
            }
        }
        Self { parts }
    }

    /// Component at `index` (0 = major), `None` if not-a-number.
    pub fn component(&self, index: usize) -> Option<f64> {
        self.parts.get(index).copied().flatten()
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        for (a, b) in self.parts.iter().zip(other.parts.iter()) {
            // -0 and 0 are equal, as in JavaScript
            if let (Some(a), Some(b)) = (a, b) {
                match a.partial_cmp(b) {
                    Some(Ordering::Equal) | None => {}
                    Some(unequal) => return unequal,
                }
            }
        }
        Ordering::Equal
    }
}

/// Read a leading base-10 integer: leading whitespace is skipped, one
/// optional sign is accepted, and digits are consumed until the first
/// non-digit. Returns `None` when no digit follows.
fn parse_int_prefix(segment: &str) -> Option<f64> {
    let s = segment.trim_start();
    let (negative, digits) = if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (false, rest)
    } else {
        (false, s)
    };

    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: f64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// A strictly parsed `major.minor.patch` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let segments: Vec<&str> = s.split('.').collect();
        if segments.len() > COMPONENTS {
            return Err(Error::invalid_version(
                s,
                format!("expected at most {COMPONENTS} components"),
            ));
        }

        let mut parts = [0u64; COMPONENTS];
        for (part, segment) in parts.iter_mut().zip(&segments) {
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::invalid_version(
                    s,
                    format!("component '{segment}' is not a decimal number"),
                ));
            }
            *part = segment
                .parse()
                .map_err(|_| Error::invalid_version(s, format!("component '{segment}' overflows")))?;
        }

        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
