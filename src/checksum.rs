//! Check digit algorithms for ISBN-10 and ISBN-13.
//!
//! Both functions take the digits that precede the check digit and return
//! `None` when any of them is not an ASCII digit.

/// Compute the ISBN-13 check digit.
///
/// ISBN-13 weights digits alternately by 1 (even positions) and 3 (odd
/// positions); the check digit brings the weighted sum to a multiple of 10.
///
/// # Examples
///
/// ```
/// use bookland::checksum::isbn13_check_digit;
///
/// assert_eq!(isbn13_check_digit("978207040850"), Some('4'));
/// assert_eq!(isbn13_check_digit("97820704085?"), None);
/// ```
#[must_use]
pub fn isbn13_check_digit(digits: &str) -> Option<char> {
    let mut sum: u64 = 0;
    for (i, ch) in digits.chars().enumerate() {
        let digit = ch.to_digit(10)?;
        let weight = if i % 2 == 0 { 1 } else { 3 };
        sum += u64::from(digit * weight);
    }

    char::from_digit(u32::try_from((10 - (sum % 10)) % 10).ok()?, 10)
}

/// Compute the ISBN-10 check digit.
///
/// ISBN-10 weights the nine code digits by 10 down to 2, mod 11. A remainder
/// of 10 is written as `X`.
///
/// # Examples
///
/// ```
/// use bookland::checksum::isbn10_check_digit;
///
/// assert_eq!(isbn10_check_digit("207040850"), Some('7'));
/// assert_eq!(isbn10_check_digit("123456789"), Some('X'));
/// ```
#[must_use]
pub fn isbn10_check_digit(code: &str) -> Option<char> {
    let mut sum: i64 = 0;
    for (i, ch) in code.chars().enumerate() {
        let digit = ch.to_digit(10)?;
        // Weights go negative past the tenth position; the sum stays meaningful mod 11.
        let weight = 10 - i64::try_from(i).unwrap_or(i64::MAX);
        sum += i64::from(digit) * weight;
    }

    match (11 - sum.rem_euclid(11)) % 11 {
        10 => Some('X'),
        x => char::from_digit(u32::try_from(x).ok()?, 10),
    }
}
