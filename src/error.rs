//! Error types for ISBN operations.
//!
//! This module provides three error types:
//!
//! - [`ValidationError`] describes why a parsed [`Isbn`](crate::Isbn) is invalid.
//!   It is reported by [`Isbn::error`](crate::Isbn::error) and never returned as `Err`.
//! - [`FormatError`] is returned by [`Isbn::format`](crate::Isbn::format) when the
//!   requested output cannot be produced.
//! - [`RegistryError`] is returned when a compiled registration-group table cannot
//!   be loaded, together with the [`Result`] convenience type.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Reason a parsed ISBN source is invalid.
///
/// Checks run in declaration order and the first failing check wins.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationError {
    /// The ean prefix is neither `978` nor `979`.
    #[error("invalid_ean_prefix")]
    InvalidEanPrefix,

    /// The source does not match the ISBN-10 or ISBN-13 shape.
    #[error("invalid_format")]
    InvalidFormat,

    /// The checksum does not match the one computed from the code.
    #[error("invalid_checksum")]
    InvalidChecksum,
}

impl ValidationError {
    /// Returns the snake-case identifier of this error (e.g. `"invalid_format"`).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidEanPrefix => "invalid_ean_prefix",
            Self::InvalidFormat => "invalid_format",
            Self::InvalidChecksum => "invalid_checksum",
        }
    }
}

/// Error returned by [`Isbn::format`](crate::Isbn::format).
///
/// Each message names the failing condition and how to avoid it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The source is not a valid ISBN.
    #[error("invalid_source (check is_valid before formatting; error: {error}; source: {input:?})")]
    InvalidSource {
        /// Why the source is invalid
        error: ValidationError,
        /// The unmodified source
        input: String,
    },

    /// None of the requested versions can represent this ISBN.
    ///
    /// Only `978` ISBN-13 identifiers have an ISBN-10 form.
    #[error("incompatible_version (use version isbn13; or chain version preferences)")]
    IncompatibleVersion,

    /// Hyphens were requested from the registration-group table but no group
    /// (or no registrant range within the group) matches the code.
    #[error(
        "registration_group_not_found (disable hyphens; or chain hyphens preferences; or update the registration-group table)"
    )]
    RegistrationGroupNotFound,

    /// Hyphens were requested from the source but it does not split into
    /// exactly three code parts.
    #[error("missing_or_invalid_hyphens (disable hyphens; or chain hyphens preferences)")]
    MissingOrInvalidHyphens,
}

/// Error raised while loading or building a registration-group table.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The table data is structurally invalid.
    #[error("Invalid registration-group data: {0}")]
    InvalidData(String),

    /// The table could not be parsed as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error from the underlying source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for [`std::result::Result`] with [`RegistryError`].
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Path inside a compiled table, used to locate data errors.
#[derive(Debug, Clone, Default)]
pub(crate) struct DataPath(Vec<String>);

impl DataPath {
    pub(crate) fn child(&self, key: &str) -> Self {
        let mut path = self.0.clone();
        path.push(key.to_string());
        Self(path)
    }

    pub(crate) fn error(&self, message: impl fmt::Display) -> RegistryError {
        RegistryError::InvalidData(format!("{message} at {self}"))
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        f.write_str(&self.0.join("."))
    }
}
