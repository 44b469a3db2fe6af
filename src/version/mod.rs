//! Podman version parsing and parameter version windows.
//!
//! Versions compare component-wise as integers, so `4.10.0` sorts after
//! `4.9.3` and `4.3` equals `4.3.0`. A pre-release suffix (`4.4.0-dev`) sorts
//! before the corresponding release.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::DiffError;

/// A parsed Podman engine version.
#[derive(Debug, Clone)]
pub struct EngineVersion {
    raw: String,
    release: Vec<u64>,
    pre_release: Option<String>,
}

impl EngineVersion {
    /// Parse a version string such as `4.9.3`, `v4.3` or `4.4.0-dev`.
    ///
    /// # Errors
    ///
    /// Returns `DiffError::InvalidVersion` when the text has no leading numeric
    /// component.
    pub fn parse(input: &str) -> Result<Self, DiffError> {
        let trimmed = input.trim();
        let candidate = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let (release_text, pre_release) = match candidate.split_once(['-', '+', '~']) {
            Some((release, suffix)) => (release, Some(suffix.to_owned())),
            None => (candidate, None),
        };

        let mut release = Vec::new();
        for component in release_text.split('.') {
            let digits: String = component
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            if digits.is_empty() {
                break;
            }
            let number = digits.parse::<u64>().map_err(|_| DiffError::InvalidVersion {
                version: input.to_owned(),
            })?;
            release.push(number);
            if digits.len() != component.len() {
                break;
            }
        }

        if release.is_empty() {
            return Err(DiffError::InvalidVersion {
                version: input.to_owned(),
            });
        }

        Ok(Self {
            raw: candidate.to_owned(),
            release,
            pre_release,
        })
    }

    /// Extract the version from `podman --version` or `podman version` output.
    ///
    /// The last whitespace-separated token that starts with a digit is used, so
    /// both `podman version 4.9.3` and `Version:      4.9.3` are understood.
    ///
    /// # Errors
    ///
    /// Returns `DiffError::InvalidVersion` when no version token is present.
    pub fn from_version_output(output: &str) -> Result<Self, DiffError> {
        output
            .split_whitespace()
            .rev()
            .find(|token| token.starts_with(|c: char| c.is_ascii_digit()))
            .map_or_else(
                || {
                    Err(DiffError::InvalidVersion {
                        version: output.trim().to_owned(),
                    })
                },
                Self::parse,
            )
    }

    /// The numeric release components.
    #[must_use]
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// Whether the version is at least `major.minor.patch`.
    #[must_use]
    pub fn at_least(&self, major: u64, minor: u64, patch: u64) -> bool {
        compare_release(&self.release, &[major, minor, patch]) != Ordering::Less
    }

    /// Whether the version belongs to the `major.minor` series.
    #[must_use]
    pub fn in_series(&self, major: u64, minor: u64) -> bool {
        self.release.first() == Some(&major) && self.release.get(1).copied().unwrap_or(0) == minor
    }
}

fn compare_release(left: &[u64], right: &[u64]) -> Ordering {
    let width = left.len().max(right.len());
    (0..width)
        .map(|index| {
            (
                left.get(index).copied().unwrap_or(0),
                right.get(index).copied().unwrap_or(0),
            )
        })
        .find(|(lhs, rhs)| lhs != rhs)
        .map_or(Ordering::Equal, |(lhs, rhs)| lhs.cmp(&rhs))
}

impl Ord for EngineVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_release(&self.release, &other.release).then_with(|| {
            match (&self.pre_release, &other.pre_release) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(lhs), Some(rhs)) => lhs.cmp(rhs),
            }
        })
    }
}

impl PartialOrd for EngineVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for EngineVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EngineVersion {}

impl FromStr for EngineVersion {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Which side of a version window a parameter violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateBound {
    /// The engine is older than the first supporting release.
    Minimum,
    /// The engine is newer than the last supporting release.
    Maximum,
}

impl fmt::Display for GateBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimum => f.write_str("from"),
            Self::Maximum => f.write_str("until"),
        }
    }
}

/// A failed version check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateViolation {
    /// The violated bound.
    pub bound: GateBound,
    /// The version text of the violated bound.
    pub required: &'static str,
}

/// An inclusive window of engine versions that support a parameter.
///
/// Bounds are version literals fixed at catalog definition time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionGate {
    min: Option<&'static str>,
    max: Option<&'static str>,
}

impl VersionGate {
    /// A gate that admits every version.
    pub const OPEN: Self = Self {
        min: None,
        max: None,
    };

    /// Supported from `min` onwards.
    #[must_use]
    pub const fn since(min: &'static str) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Supported up to and including `max`.
    #[must_use]
    pub const fn until(max: &'static str) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Supported between `min` and `max`, both inclusive.
    #[must_use]
    pub const fn between(min: &'static str, max: &'static str) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// The lower bound, if any.
    #[must_use]
    pub const fn min(&self) -> Option<&'static str> {
        self.min
    }

    /// The upper bound, if any.
    #[must_use]
    pub const fn max(&self) -> Option<&'static str> {
        self.max
    }

    /// Whether the gate has no bounds at all.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Check `version` against both bounds.
    ///
    /// # Errors
    ///
    /// Returns the violated bound when `version` lies outside the window.
    pub fn check(&self, version: &EngineVersion) -> Result<(), GateViolation> {
        if let Some(min) = self.min {
            if EngineVersion::parse(min).is_ok_and(|bound| *version < bound) {
                return Err(GateViolation {
                    bound: GateBound::Minimum,
                    required: min,
                });
            }
        }
        if let Some(max) = self.max {
            if EngineVersion::parse(max).is_ok_and(|bound| *version > bound) {
                return Err(GateViolation {
                    bound: GateBound::Maximum,
                    required: max,
                });
            }
        }
        Ok(())
    }

    /// Whether `version` lies inside the window.
    #[must_use]
    pub fn admits(&self, version: &EngineVersion) -> bool {
        self.check(version).is_ok()
    }
}

impl fmt::Display for VersionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (None, None) => f.write_str("any"),
            (Some(min), None) => write!(f, ">= {min}"),
            (None, Some(max)) => write!(f, "<= {max}"),
            (Some(min), Some(max)) => write!(f, "{min} ..= {max}"),
        }
    }
}

#[cfg(test)]
mod tests;
