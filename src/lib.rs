#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! ## Modules
//!
//! - [`isbn`]: The parsed identifier ([`Isbn`]) and its derived values
//! - [`checksum`]: ISBN-10 and ISBN-13 check digits
//! - [`registration_group`]: Registration groups and the prefix tree that locates them
//! - [`json`]: Loading and saving compiled registration-group tables
//! - [`format`]: Formatting, hyphenation and version conversion
//! - [`search`]: Extracting ISBNs from free text
//! - [`config`]: Format and search options
//! - [`error`]: Error types and result type
//!
//! ## Registration-group tables
//!
//! Parsing, validation, checksums and version conversion need no data.
//! Canonical hyphenation and agency lookup need a [`RegistrationGroups`]
//! table, usually loaded once from a compiled JSON file and shared by
//! reference:
//!
//! ```no_run
//! use bookland::{FormatOptions, Hyphens, RegistrationGroups};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let groups = RegistrationGroups::from_path("registration_groups.json")?;
//! let isbn = groups.parse("9782070408504");
//! let options = FormatOptions::new().with_hyphens(Hyphens::RegistrationGroup);
//! println!("{}", isbn.format(&options)?);
//! # Ok(())
//! # }
//! ```

pub mod checksum;
pub mod config;
pub mod error;
pub mod format;
mod grammar;
pub mod isbn;
pub mod json;
pub mod registration_group;
pub mod search;

pub use config::{FormatOptions, Hyphens, SearchOptions, Version};
pub use error::{FormatError, RegistryError, Result, ValidationError};
pub use isbn::{CodeParts, Isbn, UNKNOWN_CHECKSUM};
pub use registration_group::{
    Agency, PrefixNode, RegistrationGroup, RegistrationGroups, Resolution,
};
pub use search::{search, search_all, IsbnMatches};

/// Parse `source` without a registration-group table.
///
/// Shorthand for [`Isbn::parse`].
///
/// # Examples
///
/// ```
/// let isbn = bookland::parse("2-07-040850-7");
/// assert!(isbn.is_valid());
/// ```
#[must_use]
pub fn parse(source: &str) -> Isbn<'static> {
    Isbn::parse(source)
}
