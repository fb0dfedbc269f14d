//! Extracting ISBNs from free text.
//!
//! A candidate is a substring with the ISBN-13 or ISBN-10 shape that is not
//! adjacent to further digits or hyphens, so `0-330-28498-31-58182-008-9`
//! yields nothing rather than a fragment. Candidates are scanned left to
//! right without overlap and only valid ones are kept.
//!
//! # Examples
//!
//! ```
//! use bookland::{search, search_all, FormatOptions, SearchOptions};
//!
//! let text = "good: 2-226-05257-7; invalid checksum: 3-7965-1900-9; good: 4198301271";
//!
//! let first = search(text).unwrap();
//! assert_eq!(first.source(), "2-226-05257-7");
//!
//! let all = search_all(text, &SearchOptions::default());
//! let sources: Vec<&str> = all.iter().map(|isbn| isbn.source()).collect();
//! assert_eq!(sources, vec!["2-226-05257-7", "4198301271"]);
//! ```

use crate::config::SearchOptions;
use crate::grammar::{is_isbn10_shape, is_isbn13_shape, is_run_byte};
use crate::isbn::Isbn;
use crate::registration_group::RegistrationGroups;
use log::trace;
use std::iter::FusedIterator;

/// Lazy iterator over the valid ISBNs of a text.
///
/// Created by [`RegistrationGroups::find_iter`].
#[derive(Debug, Clone)]
pub struct IsbnMatches<'r, 't> {
    groups: &'r RegistrationGroups,
    text: &'t str,
    pos: usize,
}

impl<'r, 't> IsbnMatches<'r, 't> {
    fn new(groups: &'r RegistrationGroups, text: &'t str) -> Self {
        Self {
            groups,
            text,
            pos: 0,
        }
    }

    /// The part of the text not scanned yet.
    #[must_use]
    pub fn remainder(&self) -> &'t str {
        &self.text[self.pos..]
    }
}

impl<'r> Iterator for IsbnMatches<'r, '_> {
    type Item = Isbn<'r>;

    fn next(&mut self) -> Option<Isbn<'r>> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() {
            let start = self.pos;
            self.pos += 1;
            if !is_candidate_start(bytes, start) {
                continue;
            }
            let Some(end) = candidate_end(self.text, start) else {
                continue;
            };

            self.pos = end;
            let candidate = &self.text[start..end];
            let isbn = self.groups.parse(candidate);
            match isbn.error() {
                None => return Some(isbn),
                Some(error) => trace!("rejected candidate {candidate:?} at {start}: {error}"),
            }
        }
        None
    }
}

impl FusedIterator for IsbnMatches<'_, '_> {}

/// A digit that does not continue a digit-or-hyphen run.
fn is_candidate_start(bytes: &[u8], pos: usize) -> bool {
    bytes[pos].is_ascii_digit() && (pos == 0 || !is_run_byte(bytes[pos - 1]))
}

/// End of the candidate starting at `start`, if any.
///
/// A candidate cannot stop inside a digit-or-hyphen run, so it spans the
/// whole run, or the run plus a trailing `X` for the ISBN-10 shape. The
/// ISBN-13 shape takes precedence, then ISBN-10 ending in `X`.
fn candidate_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let run_end = start
        + bytes[start..]
            .iter()
            .take_while(|&&b| is_run_byte(b))
            .count();
    let run = &text[start..run_end];

    if is_isbn13_shape(run) {
        return Some(run_end);
    }

    let x_terminated = bytes.get(run_end) == Some(&b'X')
        && !bytes.get(run_end + 1).copied().is_some_and(is_run_byte);
    if x_terminated && is_isbn10_shape(&text[start..=run_end]) {
        return Some(run_end + 1);
    }

    is_isbn10_shape(run).then_some(run_end)
}

impl RegistrationGroups {
    /// Iterate over the valid ISBNs in `text`, resolved against this table.
    ///
    /// # Examples
    ///
    /// ```
    /// use bookland::RegistrationGroups;
    ///
    /// let groups = RegistrationGroups::new();
    /// let mut matches = groups.find_iter("9782070408500, 9784102122044, 2070408507");
    /// assert_eq!(matches.next().map(|isbn| isbn.code().to_string()), Some("410212204".into()));
    /// assert_eq!(matches.next().map(|isbn| isbn.code().to_string()), Some("207040850".into()));
    /// assert!(matches.next().is_none());
    /// ```
    #[must_use]
    pub fn find_iter<'r, 't>(&'r self, text: &'t str) -> IsbnMatches<'r, 't> {
        IsbnMatches::new(self, text)
    }

    /// The first valid ISBN in `text`.
    #[must_use]
    pub fn search(&self, text: &str) -> Option<Isbn<'_>> {
        self.find_iter(text).next()
    }

    /// All valid ISBNs in `text`, up to `options.limit`.
    #[must_use]
    pub fn search_all(&self, text: &str, options: &SearchOptions) -> Vec<Isbn<'_>> {
        let matches = self.find_iter(text);
        match options.limit {
            Some(limit) => matches.take(limit).collect(),
            None => matches.collect(),
        }
    }
}

/// The first valid ISBN in `text`, without a registration-group table.
///
/// See [`RegistrationGroups::search`] to resolve registration groups.
#[must_use]
pub fn search(text: &str) -> Option<Isbn<'static>> {
    RegistrationGroups::empty().search(text)
}

/// All valid ISBNs in `text`, without a registration-group table.
///
/// See [`RegistrationGroups::search_all`] to resolve registration groups.
#[must_use]
pub fn search_all(text: &str, options: &SearchOptions) -> Vec<Isbn<'static>> {
    RegistrationGroups::empty().search_all(text, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FormatOptions, Version};

    const SEARCH_TEXT: &str = "too many numbers: 0-330-28498-31-58182-008-9; good: 2-226-05257-7; \
        invalid checksum: 3-7965-1900-9; good: 4198301271; good: 978-600-119-125-1;";

    fn in_own_version(isbn: &Isbn<'_>) -> String {
        isbn.format(&FormatOptions::new().with_version(isbn.version()))
            .unwrap()
    }

    fn sources(text: &str) -> Vec<String> {
        search_all(text, &SearchOptions::default())
            .iter()
            .map(|isbn| isbn.source().to_string())
            .collect()
    }

    #[test]
    fn test_search_first() {
        let isbn = search(SEARCH_TEXT).unwrap();
        assert_eq!(
            isbn.format(&FormatOptions::new().with_version(Version::Isbn10))
                .unwrap(),
            "2226052577"
        );
    }

    #[test]
    fn test_search_ambiguous_run() {
        assert!(search("too many numbers: 0-330-28498-31-58182-008-9;").is_none());
        assert!(search_all("too many numbers: 0-330-28498-31-58182-008-9;", &SearchOptions::default())
            .is_empty());
    }

    #[test]
    fn test_search_all() {
        let found: Vec<String> = search_all(SEARCH_TEXT, &SearchOptions::default())
            .iter()
            .map(in_own_version)
            .collect();
        assert_eq!(found, vec!["2226052577", "4198301271", "9786001191251"]);
    }

    #[test]
    fn test_search_all_limit() {
        let found: Vec<String> = search_all(SEARCH_TEXT, &SearchOptions::new().with_limit(2))
            .iter()
            .map(in_own_version)
            .collect();
        assert_eq!(found, vec!["2226052577", "4198301271"]);

        assert!(search_all(SEARCH_TEXT, &SearchOptions::new().with_limit(0)).is_empty());
        assert_eq!(search_all(SEARCH_TEXT, &SearchOptions::new().with_limit(10)).len(), 3);
    }

    #[test]
    fn test_search_skips_invalid_checksums() {
        assert_eq!(
            sources("Check these out: 9782070408500, 9784102122044, 2070408507, 9789287191908"),
            vec!["9784102122044", "2070408507", "9789287191908"]
        );
    }

    #[test]
    fn test_search_x_checksum() {
        assert_eq!(sources("isbn 123-456-789-X."), vec!["123-456-789-X"]);
        assert_eq!(sources("isbn 123456789X"), vec!["123456789X"]);
        // X followed by a digit is not a boundary
        assert!(sources("isbn 123456789X5").is_empty());
        assert!(sources("isbn 123456789x").is_empty());
    }

    #[test]
    fn test_search_boundaries() {
        assert!(sources("12070408507").is_empty());
        assert!(sources("-2070408507").is_empty());
        assert!(sources("2070408507-").is_empty());
        assert_eq!(sources("a2070408507b"), vec!["2070408507"]);
        assert_eq!(sources("(2070408507)"), vec!["2070408507"]);
        assert_eq!(sources("«2070408507»"), vec!["2070408507"]);
    }

    #[test]
    fn test_search_empty_text() {
        assert!(search("").is_none());
        assert!(search("no digits here").is_none());
    }

    #[test]
    fn test_find_iter_is_lazy() {
        let groups = RegistrationGroups::new();
        let mut matches = groups.find_iter("2070408507 then 4198301271 and more");
        assert_eq!(matches.next().unwrap().source(), "2070408507");
        assert_eq!(matches.remainder(), " then 4198301271 and more");
        assert_eq!(matches.next().unwrap().source(), "4198301271");
        assert!(matches.next().is_none());
        assert!(matches.next().is_none());
    }

    #[test]
    fn test_candidate_end_precedence() {
        assert_eq!(candidate_end("9782070408504", 0), Some(13));
        assert_eq!(candidate_end("123-456-789-X", 0), Some(13));
        assert_eq!(candidate_end("123456789X1", 0), Some(9));
        assert_eq!(candidate_end("0-330-28498-31-58182-008-9", 0), None);
        assert_eq!(candidate_end("123", 0), None);
    }
}
