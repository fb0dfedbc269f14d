//! The ISBN identifier.
//!
//! An [`Isbn`] is built from a source string by removing hyphens and splitting
//! what is left into ean prefix, code and checksum:
//!
//! ```text
//! 978-2-07-040850-4    ean prefix 978, code 207040850, checksum 4
//! 2-07-040850-7        ean prefix 978 (implied), code 207040850, checksum 7
//! ```
//!
//! Parsing never fails. Problems with the source are reported by
//! [`Isbn::error`], and everything derived from the source (validity,
//! registration group, code parts) is computed on first use and cached.

use crate::checksum::{isbn10_check_digit, isbn13_check_digit};
use crate::config::{Hyphens, Version};
use crate::error::ValidationError;
use crate::grammar;
use crate::registration_group::{Agency, RegistrationGroup, RegistrationGroups, Resolution};
use std::cell::OnceCell;
use std::fmt;

/// Checksum placeholder for a source whose check digit is not known yet.
pub const UNKNOWN_CHECKSUM: char = '?';

/// The code split into registration-group prefix, registrant and publication.
///
/// # Examples
///
/// ```
/// use bookland::Isbn;
///
/// let isbn = Isbn::parse("207-040-850-7");
/// let parts = isbn.source_code_parts().unwrap();
/// assert_eq!(parts.group(), "207");
/// assert_eq!(parts.registrant(), "040");
/// assert_eq!(parts.publication(), "850");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeParts([String; 3]);

impl CodeParts {
    fn new(group: String, registrant: String, publication: String) -> Self {
        Self([group, registrant, publication])
    }

    /// Registration-group prefix
    #[must_use]
    pub fn group(&self) -> &str {
        &self.0[0]
    }

    /// Registrant element
    #[must_use]
    pub fn registrant(&self) -> &str {
        &self.0[1]
    }

    /// Publication element
    #[must_use]
    pub fn publication(&self) -> &str {
        &self.0[2]
    }

    /// The three parts as string slices.
    #[must_use]
    pub fn as_strs(&self) -> [&str; 3] {
        [self.group(), self.registrant(), self.publication()]
    }

    /// The three parts in order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// A parsed ISBN.
///
/// Fields are fixed at parse time. The ISBN borrows the
/// [`RegistrationGroups`] table it was parsed against, which is what
/// [`agency`](Isbn::agency) and [`code_parts`](Isbn::code_parts) consult.
///
/// # Examples
///
/// ```
/// use bookland::{Isbn, ValidationError, Version};
///
/// let isbn = Isbn::parse("978-2-07-040850-4");
/// assert_eq!(isbn.version(), Version::Isbn13);
/// assert_eq!(isbn.ean_prefix(), "978");
/// assert_eq!(isbn.code(), "207040850");
/// assert_eq!(isbn.checksum(), '4');
/// assert!(isbn.is_valid());
///
/// assert_eq!(Isbn::parse("2070408508").error(), Some(ValidationError::InvalidChecksum));
/// ```
#[derive(Clone)]
pub struct Isbn<'r> {
    source: String,
    version: Version,
    ean_prefix: String,
    code: String,
    checksum: char,
    groups: &'r RegistrationGroups,
    error: OnceCell<Option<ValidationError>>,
    resolution: OnceCell<Option<Resolution<'r>>>,
    code_parts: OnceCell<Option<CodeParts>>,
    source_code_parts: OnceCell<Option<CodeParts>>,
}

impl Isbn<'static> {
    /// Parse `source` without a registration-group table.
    ///
    /// Validation, checksums and version conversion work as usual;
    /// [`agency`](Isbn::agency) and [`code_parts`](Isbn::code_parts) are
    /// always `None`. Use [`RegistrationGroups::parse`] to resolve groups.
    ///
    /// Use `?` as checksum when it is not known yet.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookland::{FormatOptions, Isbn};
    ///
    /// let isbn = Isbn::parse("207040850?");
    /// assert!(isbn.is_valid());
    /// assert_eq!(isbn.format(&FormatOptions::default()).unwrap(), "9782070408504");
    /// ```
    #[must_use]
    pub fn parse(source: &str) -> Self {
        Self::parse_with(source, RegistrationGroups::empty())
    }
}

impl<'r> Isbn<'r> {
    /// Parse `source` against `groups`.
    #[must_use]
    pub fn parse_with(source: &str, groups: &'r RegistrationGroups) -> Self {
        let normalized: Vec<char> = source.chars().filter(|&c| c != '-').collect();
        let version = if normalized.len() == Version::Isbn10.length() {
            Version::Isbn10
        } else {
            Version::Isbn13
        };

        let (ean_prefix, code_start) = match version {
            Version::Isbn10 => ("978".to_string(), 0),
            Version::Isbn13 => (normalized.iter().take(3).collect(), 3),
        };
        let code_end = normalized.len().saturating_sub(1);
        let code = normalized
            .get(code_start..code_end)
            .map(|chars| chars.iter().collect())
            .unwrap_or_default();
        let checksum = normalized.last().copied().unwrap_or(UNKNOWN_CHECKSUM);

        Self {
            source: source.to_string(),
            version,
            ean_prefix,
            code,
            checksum,
            groups,
            error: OnceCell::new(),
            resolution: OnceCell::new(),
            code_parts: OnceCell::new(),
            source_code_parts: OnceCell::new(),
        }
    }

    /// The unmodified source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// [`Version::Isbn10`] when the source has 10 characters besides hyphens,
    /// [`Version::Isbn13`] otherwise.
    #[must_use]
    pub fn version(&self) -> Version {
        self.version
    }

    /// `978` or `979` for ISBN-13 sources, always `978` for ISBN-10 sources.
    #[must_use]
    pub fn ean_prefix(&self) -> &str {
        &self.ean_prefix
    }

    /// The part between ean prefix and checksum, without hyphens.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The last character of the source: a digit, `X`, or `?` when unknown.
    #[must_use]
    pub fn checksum(&self) -> char {
        self.checksum
    }

    /// The table this ISBN resolves registration groups against.
    #[must_use]
    pub fn registration_groups(&self) -> &'r RegistrationGroups {
        self.groups
    }

    /// Whether the source is valid.
    ///
    /// Hyphen positions are not checked against registration-group
    /// boundaries.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error().is_none()
    }

    /// Why the source is invalid, or `None` when it is valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookland::{Isbn, ValidationError};
    ///
    /// assert_eq!(Isbn::parse("207040850?").error(), None);
    /// assert_eq!(Isbn::parse("2070408508").error(), Some(ValidationError::InvalidChecksum));
    /// assert_eq!(Isbn::parse("2-07-040-850-7").error(), Some(ValidationError::InvalidFormat));
    /// assert_eq!(Isbn::parse("977207040850?").error(), Some(ValidationError::InvalidEanPrefix));
    /// ```
    #[must_use]
    pub fn error(&self) -> Option<ValidationError> {
        *self.error.get_or_init(|| self.validate())
    }

    fn validate(&self) -> Option<ValidationError> {
        if !matches!(self.ean_prefix.as_str(), "978" | "979") {
            return Some(ValidationError::InvalidEanPrefix);
        }
        let digit_count = self.source.chars().filter(|&c| c != '-').count();
        if digit_count != self.version.length()
            || !grammar::is_isbn_shape(&self.source.replacen(UNKNOWN_CHECKSUM, "0", 1))
        {
            return Some(ValidationError::InvalidFormat);
        }
        if self.checksum != UNKNOWN_CHECKSUM
            && self.checksum != self.generate_checksum(self.version)
        {
            return Some(ValidationError::InvalidChecksum);
        }
        None
    }

    /// Compute the checksum of this ISBN for `version`.
    ///
    /// Returns `?` when the code contains anything but digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookland::{Isbn, Version};
    ///
    /// let isbn = Isbn::parse("2070408507");
    /// assert_eq!(isbn.generate_checksum(Version::Isbn10), '7');
    /// assert_eq!(isbn.generate_checksum(Version::Isbn13), '4');
    /// ```
    #[must_use]
    pub fn generate_checksum(&self, version: Version) -> char {
        let digit = match version {
            Version::Isbn13 => isbn13_check_digit(&format!("{}{}", self.ean_prefix, self.code)),
            Version::Isbn10 => isbn10_check_digit(&self.code),
        };
        digit.unwrap_or(UNKNOWN_CHECKSUM)
    }

    /// Whether this ISBN can be written with `version` and `hyphens`.
    ///
    /// Only `978` ISBNs have an ISBN-10 form. [`Hyphens::RegistrationGroup`]
    /// needs [`code_parts`](Isbn::code_parts), [`Hyphens::Source`] needs
    /// [`source_code_parts`](Isbn::source_code_parts). `None` places no
    /// constraint.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookland::{Hyphens, Isbn, Version};
    ///
    /// assert!(Isbn::parse("9782070408504").is_compatible(Some(Version::Isbn10), None));
    /// assert!(!Isbn::parse("9798565336375").is_compatible(Some(Version::Isbn10), None));
    /// assert!(Isbn::parse("207-040-850-7").is_compatible(None, Some(Hyphens::Source)));
    /// assert!(!Isbn::parse("2070408507").is_compatible(None, Some(Hyphens::Source)));
    /// ```
    #[must_use]
    pub fn is_compatible(&self, version: Option<Version>, hyphens: Option<Hyphens>) -> bool {
        let version_ok = version.map_or(true, |version| self.supports_version(version));
        let hyphens_ok = hyphens.map_or(true, |hyphens| self.parts_for(hyphens).is_some());
        version_ok && hyphens_ok
    }

    pub(crate) fn supports_version(&self, version: Version) -> bool {
        version == Version::Isbn13 || self.ean_prefix == "978"
    }

    /// Code parts for a hyphenation mode: `Some(None)` means "no hyphens",
    /// `None` means the mode cannot be satisfied.
    pub(crate) fn parts_for(&self, hyphens: Hyphens) -> Option<Option<&CodeParts>> {
        match hyphens {
            Hyphens::Disabled => Some(None),
            Hyphens::RegistrationGroup => self.code_parts().map(Some),
            Hyphens::Source => self.source_code_parts().map(Some),
        }
    }

    fn resolution(&self) -> Option<Resolution<'r>> {
        *self
            .resolution
            .get_or_init(|| self.groups.resolve(&self.ean_prefix, &self.code))
    }

    /// The registration group the code belongs to.
    #[must_use]
    pub fn registration_group(&self) -> Option<&'r RegistrationGroup> {
        self.resolution().map(|resolution| resolution.group)
    }

    /// The agency of the registration group, or `None` when no group matches.
    ///
    /// A matched group without descriptive data yields [`Agency::Unspecified`].
    #[must_use]
    pub fn agency(&self) -> Option<&'r Agency> {
        self.registration_group().map(RegistrationGroup::agency)
    }

    /// The code split according to the registration group.
    ///
    /// `None` when no group matches or no registrant range of the group
    /// matches the digits after the group prefix.
    #[must_use]
    pub fn code_parts(&self) -> Option<&CodeParts> {
        self.code_parts
            .get_or_init(|| {
                let Resolution { prefix_len, group } = self.resolution()?;
                let mut chars = self.code.chars();
                let prefix: String = chars.by_ref().take(prefix_len).collect();
                let rest = chars.as_str();
                let registrant_len = group.registrant_length(rest)?;
                let mut chars = rest.chars();
                let registrant: String = chars.by_ref().take(registrant_len).collect();
                Some(CodeParts::new(prefix, registrant, chars.as_str().to_string()))
            })
            .as_ref()
    }

    /// The code split where the source has hyphens.
    ///
    /// `None` unless the source splits into exactly three code parts (plus
    /// ean prefix for ISBN-13, plus checksum). The parts are not checked
    /// against the registration-group table.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookland::Isbn;
    ///
    /// let parts = Isbn::parse("978-6-219619-02-8").source_code_parts().cloned();
    /// assert_eq!(parts.as_ref().map(|p| p.as_strs()), Some(["6", "219619", "02"]));
    /// assert!(Isbn::parse("6219619028").source_code_parts().is_none());
    /// assert!(Isbn::parse("6-219619-028").source_code_parts().is_none());
    /// ```
    #[must_use]
    pub fn source_code_parts(&self) -> Option<&CodeParts> {
        self.source_code_parts
            .get_or_init(|| {
                let mut segments: Vec<&str> = self.source.split('-').collect();
                if self.version == Version::Isbn13 {
                    segments.remove(0);
                }
                segments.pop();
                match segments.as_slice() {
                    [group, registrant, publication] => Some(CodeParts::new(
                        (*group).to_string(),
                        (*registrant).to_string(),
                        (*publication).to_string(),
                    )),
                    _ => None,
                }
            })
            .as_ref()
    }
}

impl fmt::Debug for Isbn<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Isbn")
            .field("source", &self.source)
            .field("version", &self.version)
            .field("ean_prefix", &self.ean_prefix)
            .field("code", &self.code)
            .field("checksum", &self.checksum)
            .finish_non_exhaustive()
    }
}
