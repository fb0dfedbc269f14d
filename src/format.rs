//! Formatting and version conversion.
//!
//! [`Isbn::format`] writes an ISBN in the first version and the first
//! hyphenation mode of a [`FormatOptions`] preference list that can be
//! satisfied, regenerating the checksum for the chosen version.

use crate::config::{FormatOptions, Hyphens, Version};
use crate::error::FormatError;
use crate::isbn::{CodeParts, Isbn};

impl Isbn<'_> {
    /// Write this ISBN according to `options`.
    ///
    /// 1. The source must be valid.
    /// 2. The first version in `options.versions` that can represent this
    ///    ISBN is used: ISBN-13 always can, ISBN-10 only for ean prefix `978`.
    /// 3. Hyphenation modes are tried in order. [`Hyphens::Disabled`] stops
    ///    with no hyphens; the other modes are used when their code parts
    ///    exist and skipped otherwise.
    ///
    /// # Errors
    ///
    /// - [`FormatError::InvalidSource`] if the source is invalid.
    /// - [`FormatError::IncompatibleVersion`] if no requested version fits.
    /// - [`FormatError::RegistrationGroupNotFound`] or
    ///   [`FormatError::MissingOrInvalidHyphens`] if no hyphenation mode
    ///   fits, depending on the last mode tried.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookland::{FormatError, FormatOptions, Hyphens, Isbn, Version};
    ///
    /// let isbn = Isbn::parse("9782070408504");
    /// let isbn10 = FormatOptions::new().with_version(Version::Isbn10);
    /// assert_eq!(isbn.format(&isbn10).unwrap(), "2070408507");
    ///
    /// let isbn = Isbn::parse("9798565336375");
    /// assert_eq!(isbn.format(&isbn10), Err(FormatError::IncompatibleVersion));
    /// let either = FormatOptions::new().with_versions([Version::Isbn10, Version::Isbn13]);
    /// assert_eq!(isbn.format(&either).unwrap(), "9798565336375");
    ///
    /// let isbn = Isbn::parse("207-040-850-7");
    /// let source = FormatOptions::new().with_hyphens(Hyphens::Source);
    /// assert_eq!(isbn.format(&source).unwrap(), "978-207-040-850-4");
    /// ```
    pub fn format(&self, options: &FormatOptions) -> Result<String, FormatError> {
        if let Some(error) = self.error() {
            return Err(FormatError::InvalidSource {
                error,
                input: self.source().to_string(),
            });
        }

        let version = options
            .versions
            .iter()
            .copied()
            .find(|&version| self.supports_version(version))
            .ok_or(FormatError::IncompatibleVersion)?;
        let parts = self.select_parts(&options.hyphens)?;

        let checksum = self.generate_checksum(version);
        let ean_prefix = match version {
            Version::Isbn13 => Some(self.ean_prefix()),
            Version::Isbn10 => None,
        };

        let output = match parts {
            Some(parts) => {
                let mut segments: Vec<&str> = ean_prefix.into_iter().collect();
                segments.extend(parts.as_strs().into_iter().filter(|part| !part.is_empty()));
                let mut output = segments.join("-");
                output.push('-');
                output.push(checksum);
                output
            },
            None => {
                let mut output = String::with_capacity(version.length());
                output.extend(ean_prefix);
                output.push_str(self.code());
                output.push(checksum);
                output
            },
        };
        Ok(output)
    }

    /// Walk the hyphenation preferences; `Ok(None)` means no hyphens.
    fn select_parts(&self, preferences: &[Hyphens]) -> Result<Option<&CodeParts>, FormatError> {
        for &hyphens in preferences {
            if let Some(parts) = self.parts_for(hyphens) {
                return Ok(parts);
            }
        }

        match preferences.last() {
            None | Some(Hyphens::Disabled) => Ok(None),
            Some(Hyphens::RegistrationGroup) => Err(FormatError::RegistrationGroupNotFound),
            Some(Hyphens::Source) => Err(FormatError::MissingOrInvalidHyphens),
        }
    }
}
