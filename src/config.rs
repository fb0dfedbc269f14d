//! Options for formatting and searching ISBNs.
//!
//! This module provides the [`FormatOptions`] struct which controls the output of
//! [`Isbn::format`](crate::Isbn::format), and [`SearchOptions`] for
//! [`search_all`](crate::search_all).
//!
//! Both the version and the hyphenation mode are ordered preference lists. The
//! formatter uses the first entry that can be satisfied, which lets callers
//! express fallbacks like "ISBN-10 if possible, otherwise ISBN-13".

use serde::{Deserialize, Serialize};
use std::fmt;

/// ISBN encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Version {
    /// 10 characters, the last one may be `X`
    Isbn10,
    /// 13 digits starting with the ean prefix `978` or `979`
    #[default]
    Isbn13,
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Isbn10 => write!(f, "isbn10"),
            Self::Isbn13 => write!(f, "isbn13"),
        }
    }
}

impl Version {
    /// Number of characters in an ISBN of this version, without hyphens.
    #[must_use]
    pub const fn length(&self) -> usize {
        match self {
            Self::Isbn10 => 10,
            Self::Isbn13 => 13,
        }
    }
}

/// How to place hyphens in formatted output.
///
/// Serialized the same way the options were historically written: `true`
/// for [`Hyphens::RegistrationGroup`], `"source"` for [`Hyphens::Source`] and
/// `false` for [`Hyphens::Disabled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawHyphens", into = "RawHyphens")]
pub enum Hyphens {
    /// Split the code according to the registration-group table.
    RegistrationGroup,
    /// Split the code where the source had hyphens.
    Source,
    /// No hyphens.
    #[default]
    Disabled,
}

impl fmt::Display for Hyphens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegistrationGroup => write!(f, "true"),
            Self::Source => write!(f, "source"),
            Self::Disabled => write!(f, "false"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawHyphens {
    Flag(bool),
    Named(String),
}

impl TryFrom<RawHyphens> for Hyphens {
    type Error = String;

    fn try_from(raw: RawHyphens) -> Result<Self, Self::Error> {
        match raw {
            RawHyphens::Flag(true) => Ok(Self::RegistrationGroup),
            RawHyphens::Flag(false) => Ok(Self::Disabled),
            RawHyphens::Named(name) if name == "source" => Ok(Self::Source),
            RawHyphens::Named(name) => Err(format!(
                "unknown hyphens mode {name:?}, expected true, false or \"source\""
            )),
        }
    }
}

impl From<Hyphens> for RawHyphens {
    fn from(hyphens: Hyphens) -> Self {
        match hyphens {
            Hyphens::RegistrationGroup => Self::Flag(true),
            Hyphens::Source => Self::Named("source".to_string()),
            Hyphens::Disabled => Self::Flag(false),
        }
    }
}

/// Configuration for [`Isbn::format`](crate::Isbn::format).
///
/// # Examples
///
/// ```
/// use bookland::{FormatOptions, Hyphens, Version};
///
/// // Default configuration (ISBN-13, no hyphens)
/// let options = FormatOptions::default();
/// assert_eq!(options.versions, vec![Version::Isbn13]);
///
/// // ISBN-10 when possible, canonical hyphens when the table knows the group,
/// // no hyphens otherwise
/// let options = FormatOptions::new()
///     .with_versions([Version::Isbn10, Version::Isbn13])
///     .with_hyphens_chain([Hyphens::RegistrationGroup, Hyphens::Disabled]);
/// assert_eq!(options.hyphens.len(), 2);
/// ```
///
/// Options can also be read from JSON, where each entry may be a single value
/// or a preference list:
///
/// ```
/// use bookland::{FormatOptions, Hyphens, Version};
///
/// let options: FormatOptions =
///     serde_json::from_str(r#"{"version": ["isbn10", "isbn13"], "hyphens": [true, "source", false]}"#)?;
/// assert_eq!(options.versions, vec![Version::Isbn10, Version::Isbn13]);
/// assert_eq!(options.hyphens[1], Hyphens::Source);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFormatOptions")]
pub struct FormatOptions {
    /// Versions in order of preference.
    ///
    /// The first ISBN-13 entry always succeeds; an ISBN-10 entry succeeds only
    /// for `978` identifiers. An empty list never succeeds.
    #[serde(rename = "version")]
    pub versions: Vec<Version>,

    /// Hyphenation modes in order of preference.
    ///
    /// An empty list behaves like `[Hyphens::Disabled]`.
    pub hyphens: Vec<Hyphens>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            versions: vec![Version::Isbn13],
            hyphens: vec![Hyphens::Disabled],
        }
    }
}

impl FormatOptions {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single output version.
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.versions = vec![version];
        self
    }

    /// Sets the output versions in order of preference.
    #[must_use]
    pub fn with_versions(mut self, versions: impl IntoIterator<Item = Version>) -> Self {
        self.versions = versions.into_iter().collect();
        self
    }

    /// Sets a single hyphenation mode.
    #[must_use]
    pub fn with_hyphens(mut self, hyphens: Hyphens) -> Self {
        self.hyphens = vec![hyphens];
        self
    }

    /// Sets the hyphenation modes in order of preference.
    #[must_use]
    pub fn with_hyphens_chain(mut self, hyphens: impl IntoIterator<Item = Hyphens>) -> Self {
        self.hyphens = hyphens.into_iter().collect();
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFormatOptions {
    version: Option<OneOrMany<Version>>,
    hyphens: Option<OneOrMany<Hyphens>>,
}

impl From<RawFormatOptions> for FormatOptions {
    fn from(raw: RawFormatOptions) -> Self {
        let defaults = Self::default();
        Self {
            versions: raw.version.map_or(defaults.versions, Vec::from),
            hyphens: raw.hyphens.map_or(defaults.hyphens, Vec::from),
        }
    }
}

/// Configuration for [`search_all`](crate::search_all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Maximum number of valid ISBNs to return; `None` for no limit.
    pub limit: Option<usize>,
}

impl SearchOptions {
    /// Creates a new configuration without a limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of results.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}
