//! The textual shape of an ISBN.
//!
//! An ISBN-13 is the ean prefix (`978` or `979`) followed by three numeric
//! groups and a final digit. An ISBN-10 is three numeric groups followed by a
//! final digit or `X`. Hyphens between groups are optional, so `9782070408504`
//! and `978-2-07-040850-4` both qualify, while leading, trailing or doubled
//! hyphens never do.
//!
//! The shapes only bound the number of hyphens; the digit count is checked by
//! the caller through the normalized length.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ISBN13_SHAPE: Regex =
        Regex::new(r"^97[89]-?(?:[0-9]+-?){3}[0-9]$").expect("ISBN-13 shape is a valid regex");
    static ref ISBN10_SHAPE: Regex =
        Regex::new(r"^(?:[0-9]+-?){3}[0-9X]$").expect("ISBN-10 shape is a valid regex");
}

/// Whether `s` has the ISBN-13 shape.
pub(crate) fn is_isbn13_shape(s: &str) -> bool {
    ISBN13_SHAPE.is_match(s)
}

/// Whether `s` has the ISBN-10 shape.
pub(crate) fn is_isbn10_shape(s: &str) -> bool {
    ISBN10_SHAPE.is_match(s)
}

/// Whether `s` has either shape.
pub(crate) fn is_isbn_shape(s: &str) -> bool {
    is_isbn13_shape(s) || is_isbn10_shape(s)
}

/// Whether `b` may not border a match: ASCII digits and hyphens.
pub(crate) const fn is_run_byte(b: u8) -> bool {
    b.is_ascii_digit() || b == b'-'
}
