//! ISBN registration groups and the prefix tree that locates them.
//!
//! A registration group is a block of the ISBN numbering space allotted to a
//! country, a language area or an agency, for example `978-2` (French) or
//! `979-10` (France). Within a group, registrants (publishers) receive ranges
//! of a fixed digit length, and whatever follows the registrant is the
//! publication element.
//!
//! # Structure
//!
//! [`RegistrationGroups`] maps each ean prefix (`978`, `979`) to a tree of
//! [`PrefixNode`]s keyed by successive code digits. A node carrying a
//! [`RegistrationGroup`] is terminal: group prefixes never extend one another,
//! so the first terminal node met while walking the code is the match.
//!
//! ```text
//! 978 ─┬─ 0 ─────────── EN   [0-19]/2 [200-699]/3 ...
//!      ├─ 6 ─┬─ 0 ─ 0 ─ IR
//!      │     └─ 5 ───── BR
//!      └─ 9 ─── 2 ───── NGO Publishers
//! ```
//!
//! The table itself is data: load it with
//! [`RegistrationGroups::from_json_str`] (see [`crate::json`]) or build it with
//! [`RegistrationGroups::insert`].

use crate::error::{RegistryError, Result};
use crate::isbn::Isbn;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::ops::RangeInclusive;

/// Longest registrant element a range may describe.
pub const MAX_REGISTRANT_LENGTH: u8 = 7;

/// Descriptive tag of a registration group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Agency {
    /// Name of the registration agency (e.g. "International NGO Publishers and EU Organizations")
    Name(String),
    /// ISO 3166 country code (e.g. "JP")
    CountryCode(String),
    /// ISO 639 language code (e.g. "EN")
    LangCode(String),
    /// The group carries no descriptive tag
    #[default]
    Unspecified,
}

impl Agency {
    /// The agency name, if this is [`Agency::Name`].
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            _ => None,
        }
    }

    /// The country code, if this is [`Agency::CountryCode`].
    #[must_use]
    pub fn country_code(&self) -> Option<&str> {
        match self {
            Self::CountryCode(code) => Some(code),
            _ => None,
        }
    }

    /// The language code, if this is [`Agency::LangCode`].
    #[must_use]
    pub fn lang_code(&self) -> Option<&str> {
        match self {
            Self::LangCode(code) => Some(code),
            _ => None,
        }
    }
}

/// Serializes as a single-entry object (`{"countryCode": "JP"}`) or `{}`.
impl Serialize for Agency {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entry = match self {
            Self::Name(name) => Some(("name", name)),
            Self::CountryCode(code) => Some(("countryCode", code)),
            Self::LangCode(code) => Some(("langCode", code)),
            Self::Unspecified => None,
        };
        let mut map = serializer.serialize_map(Some(usize::from(entry.is_some())))?;
        if let Some((key, value)) = entry {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// A registration group: its agency and the registrant ranges it has allotted.
///
/// Ranges are grouped by registrant length and each bound is truncated to that
/// many digits, so the range `2000000-6999999` of length 3 is stored as
/// `200..=699`. Lengths keep the order in which they were added.
///
/// # Examples
///
/// ```
/// use bookland::{Agency, RegistrationGroup};
///
/// let group = RegistrationGroup::new(Agency::LangCode("FR".into()))
///     .with_range(2, 0, 19)
///     .with_range(3, 200, 349);
///
/// assert_eq!(group.registrant_length("070408"), Some(2));
/// assert_eq!(group.registrant_length("226052"), Some(3));
/// assert_eq!(group.registrant_length("999999"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationGroup {
    ranges_by_length: IndexMap<u8, Vec<RangeInclusive<u32>>>,
    agency: Agency,
}

impl RegistrationGroup {
    /// Create a group without ranges.
    #[must_use]
    pub fn new(agency: Agency) -> Self {
        Self {
            ranges_by_length: IndexMap::new(),
            agency,
        }
    }

    /// Add a registrant range and return the group.
    #[must_use]
    pub fn with_range(mut self, length: u8, low: u32, high: u32) -> Self {
        self.add_range(length, low, high);
        self
    }

    /// Add a registrant range of `length` digits.
    ///
    /// Ranges with `low > high` never match, nor do lengths outside
    /// `1..=MAX_REGISTRANT_LENGTH`; compiled tables reject both.
    pub fn add_range(&mut self, length: u8, low: u32, high: u32) {
        self.ranges_by_length
            .entry(length)
            .or_default()
            .push(low..=high);
    }

    /// The group's agency.
    #[must_use]
    pub fn agency(&self) -> &Agency {
        &self.agency
    }

    /// Registrant ranges by length, in insertion order.
    #[must_use]
    pub fn ranges_by_length(&self) -> &IndexMap<u8, Vec<RangeInclusive<u32>>> {
        &self.ranges_by_length
    }

    /// Find the registrant length for the digits that follow the group prefix.
    ///
    /// Lengths are tried in insertion order; for each, the leading `length`
    /// digits of `rest` are read as a number and checked against that
    /// length's ranges. The first length with a matching range wins.
    #[must_use]
    pub fn registrant_length(&self, rest: &str) -> Option<usize> {
        self.ranges_by_length.iter().find_map(|(&length, ranges)| {
            if !(1..=MAX_REGISTRANT_LENGTH).contains(&length) {
                return None;
            }
            let length = usize::from(length);
            let registrant: String = rest.chars().take(length).collect();
            let value = leading_number(&registrant)?;
            ranges
                .iter()
                .any(|range| range.contains(&value))
                .then_some(length)
        })
    }
}

/// Parse the leading ASCII digits of `s`, ignoring anything after them.
fn leading_number(s: &str) -> Option<u32> {
    let end = s.bytes().take_while(u8::is_ascii_digit).count();
    s[..end].parse().ok()
}

/// A node of the prefix tree.
///
/// Children are keyed by a single ASCII digit. A node is terminal when it
/// carries a group, whether or not it also has children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrefixNode {
    children: IndexMap<char, PrefixNode>,
    group: Option<RegistrationGroup>,
}

impl PrefixNode {
    /// Create an empty inner node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The child reached through `digit`.
    #[must_use]
    pub fn child(&self, digit: char) -> Option<&PrefixNode> {
        self.children.get(&digit)
    }

    /// All children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (char, &PrefixNode)> {
        self.children.iter().map(|(&digit, node)| (digit, node))
    }

    /// The group this node terminates, if any.
    #[must_use]
    pub fn group(&self) -> Option<&RegistrationGroup> {
        self.group.as_ref()
    }

    pub(crate) fn child_mut(&mut self, digit: char) -> &mut PrefixNode {
        self.children.entry(digit).or_default()
    }

    pub(crate) fn set_group(&mut self, group: RegistrationGroup) -> Option<RegistrationGroup> {
        self.group.replace(group)
    }

    fn group_count(&self) -> usize {
        usize::from(self.group.is_some())
            + self
                .children
                .values()
                .map(PrefixNode::group_count)
                .sum::<usize>()
    }
}

/// The registration group matched by a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'r> {
    /// Number of leading code digits forming the group prefix
    pub prefix_len: usize,
    /// The matched group
    pub group: &'r RegistrationGroup,
}

lazy_static! {
    static ref EMPTY: RegistrationGroups = RegistrationGroups::new();
}

/// Registration-group prefix trees by ean prefix.
///
/// The table is immutable once built and is shared by reference: every
/// [`Isbn`] parsed through [`RegistrationGroups::parse`] borrows it.
///
/// # Examples
///
/// ```
/// use bookland::{Agency, RegistrationGroup, RegistrationGroups};
///
/// # fn main() -> bookland::Result<()> {
/// let mut groups = RegistrationGroups::new();
/// groups.insert(
///     "978",
///     "2",
///     RegistrationGroup::new(Agency::LangCode("FR".into())).with_range(2, 0, 19),
/// )?;
///
/// let isbn = groups.parse("2070408507");
/// assert_eq!(isbn.agency(), Some(&Agency::LangCode("FR".into())));
/// assert_eq!(isbn.code_parts().map(|parts| parts.as_strs()), Some(["2", "07", "040850"]));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationGroups {
    trees: IndexMap<String, PrefixNode>,
}

impl RegistrationGroups {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A shared empty table.
    ///
    /// ISBNs parsed against it validate and convert normally but never
    /// resolve a registration group.
    #[must_use]
    pub fn empty() -> &'static RegistrationGroups {
        &EMPTY
    }

    /// Add a group under `ean_prefix` at the path spelled by `code_prefix`.
    ///
    /// Returns the group previously stored at that path, if any.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidData`] if `ean_prefix` is not three
    /// ASCII digits or `code_prefix` is not a non-empty run of ASCII digits.
    pub fn insert(
        &mut self,
        ean_prefix: &str,
        code_prefix: &str,
        group: RegistrationGroup,
    ) -> Result<Option<RegistrationGroup>> {
        if !is_ean_prefix(ean_prefix) {
            return Err(RegistryError::InvalidData(format!(
                "ean prefix must be three digits, got {ean_prefix:?}"
            )));
        }
        if code_prefix.is_empty() || !code_prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RegistryError::InvalidData(format!(
                "code prefix must be a non-empty run of digits, got {code_prefix:?}"
            )));
        }

        let mut node = self.trees.entry(ean_prefix.to_string()).or_default();
        for digit in code_prefix.chars() {
            node = node.child_mut(digit);
        }
        Ok(node.set_group(group))
    }

    pub(crate) fn insert_tree(&mut self, ean_prefix: String, tree: PrefixNode) {
        self.trees.insert(ean_prefix, tree);
    }

    /// The prefix tree for `ean_prefix`.
    #[must_use]
    pub fn tree(&self, ean_prefix: &str) -> Option<&PrefixNode> {
        self.trees.get(ean_prefix)
    }

    /// All ean prefixes with a tree, in insertion order.
    pub fn ean_prefixes(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }

    /// Number of groups in the table.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.trees.values().map(PrefixNode::group_count).sum()
    }

    /// Whether the table holds no group.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.group_count() == 0
    }

    /// Find the group whose prefix starts `code`.
    ///
    /// Walks the tree of `ean_prefix` one code digit at a time and stops at
    /// the first node carrying a group. The tree root is never a match.
    #[must_use]
    pub fn resolve(&self, ean_prefix: &str, code: &str) -> Option<Resolution<'_>> {
        let mut node = self.trees.get(ean_prefix)?;
        for (i, digit) in code.chars().enumerate() {
            node = node.child(digit)?;
            if let Some(group) = node.group() {
                return Some(Resolution {
                    prefix_len: i + 1,
                    group,
                });
            }
        }
        None
    }

    /// Parse `source` against this table.
    ///
    /// See [`Isbn::parse`].
    #[must_use]
    pub fn parse(&self, source: &str) -> Isbn<'_> {
        Isbn::parse_with(source, self)
    }
}

pub(crate) fn is_ean_prefix(s: &str) -> bool {
    s.len() == 3 && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn french() -> RegistrationGroup {
        RegistrationGroup::new(Agency::LangCode("FR".to_string()))
            .with_range(2, 0, 19)
            .with_range(3, 200, 349)
            .with_range(5, 35000, 39999)
    }

    fn sample() -> RegistrationGroups {
        let mut groups = RegistrationGroups::new();
        groups.insert("978", "2", french()).unwrap();
        groups
            .insert(
                "978",
                "92",
                RegistrationGroup::new(Agency::Name(
                    "International NGO Publishers and EU Organizations".to_string(),
                ))
                .with_range(1, 0, 5),
            )
            .unwrap();
        groups
            .insert(
                "979",
                "10",
                RegistrationGroup::new(Agency::CountryCode("FR".to_string())).with_range(2, 0, 19),
            )
            .unwrap();
        groups
    }

    #[test]
    fn test_registrant_length() {
        let group = french();
        assert_eq!(group.registrant_length("070408"), Some(2));
        assert_eq!(group.registrant_length("226052"), Some(3));
        assert_eq!(group.registrant_length("360000"), Some(5));
        assert_eq!(group.registrant_length("990000"), None);
    }

    #[test]
    fn test_lengths_beyond_maximum_never_match() {
        let group = RegistrationGroup::new(Agency::Unspecified)
            .with_range(10, 0, u32::MAX)
            .with_range(0, 0, u32::MAX)
            .with_range(2, 0, 99);
        assert_eq!(group.registrant_length("1234567890"), Some(2));

        let group = RegistrationGroup::new(Agency::Unspecified).with_range(8, 0, 99_999_999);
        assert_eq!(group.registrant_length("12345678"), None);
    }

    #[test]
    fn test_registrant_length_follows_insertion_order() {
        // Overlapping ranges: whichever length was added first wins
        let group = RegistrationGroup::new(Agency::Unspecified)
            .with_range(3, 100, 199)
            .with_range(2, 10, 19);
        assert_eq!(group.registrant_length("150000"), Some(3));

        let group = RegistrationGroup::new(Agency::Unspecified)
            .with_range(2, 10, 19)
            .with_range(3, 100, 199);
        assert_eq!(group.registrant_length("150000"), Some(2));
    }

    #[test]
    fn test_registrant_length_short_or_non_numeric() {
        let group = french();
        assert_eq!(group.registrant_length(""), None);
        // Fewer digits than the length: the available digits are read
        assert_eq!(group.registrant_length("1"), Some(2));
        assert_eq!(group.registrant_length("ab0000"), None);
        assert_eq!(group.registrant_length("1a0000"), Some(2));
    }

    #[test]
    fn test_group_without_ranges_never_splits() {
        let group = RegistrationGroup::new(Agency::CountryCode("TH".to_string()));
        assert!(group.ranges_by_length().is_empty());
        assert_eq!(group.registrant_length("999999"), None);
    }

    #[test]
    fn test_resolve_longest_prefix_walk() {
        let groups = sample();

        let resolution = groups.resolve("978", "207040850").unwrap();
        assert_eq!(resolution.prefix_len, 1);
        assert_eq!(resolution.group.agency().lang_code(), Some("FR"));

        let resolution = groups.resolve("978", "920000000").unwrap();
        assert_eq!(resolution.prefix_len, 2);
        assert!(resolution.group.agency().name().is_some());

        let resolution = groups.resolve("979", "109063607").unwrap();
        assert_eq!(resolution.prefix_len, 2);
        assert_eq!(resolution.group.agency().country_code(), Some("FR"));
    }

    #[test]
    fn test_resolve_misses() {
        let groups = sample();
        // No child for the next digit
        assert!(groups.resolve("978", "669999999").is_none());
        // Inner node reached but the code ends
        assert!(groups.resolve("978", "9").is_none());
        // Unknown ean prefix
        assert!(groups.resolve("980", "207040850").is_none());
        // Known digit path but the wrong ean prefix
        assert!(groups.resolve("979", "207040850").is_none());
    }

    #[test]
    fn test_terminal_node_with_children_matches_first() {
        let mut groups = RegistrationGroups::new();
        groups
            .insert("978", "6", RegistrationGroup::new(Agency::Unspecified))
            .unwrap();
        groups
            .insert(
                "978",
                "65",
                RegistrationGroup::new(Agency::CountryCode("BR".to_string())),
            )
            .unwrap();

        let resolution = groups.resolve("978", "655525005").unwrap();
        assert_eq!(resolution.prefix_len, 1);
        assert_eq!(resolution.group.agency(), &Agency::Unspecified);
    }

    #[test]
    fn test_insert_replaces_and_validates() {
        let mut groups = sample();
        let previous = groups
            .insert("978", "2", RegistrationGroup::new(Agency::Unspecified))
            .unwrap();
        assert_eq!(previous, Some(french()));

        assert!(groups.insert("97", "2", french()).is_err());
        assert!(groups.insert("978", "", french()).is_err());
        assert!(groups.insert("978", "2a", french()).is_err());
    }

    #[test]
    fn test_table_metadata() {
        let groups = sample();
        assert_eq!(groups.group_count(), 3);
        assert!(!groups.is_empty());
        assert_eq!(groups.ean_prefixes().collect::<Vec<_>>(), vec!["978", "979"]);
        assert!(groups.tree("978").unwrap().child('9').unwrap().group().is_none());
        assert!(RegistrationGroups::empty().is_empty());
    }

    #[test]
    fn test_agency_accessors() {
        let agency = Agency::CountryCode("JP".to_string());
        assert_eq!(agency.country_code(), Some("JP"));
        assert_eq!(agency.name(), None);
        assert_eq!(agency.lang_code(), None);
        assert_eq!(Agency::default(), Agency::Unspecified);
    }

    #[test]
    fn test_agency_serialization() {
        let json = |agency: &Agency| serde_json::to_value(agency).unwrap();
        assert_eq!(
            json(&Agency::LangCode("EN".to_string())),
            serde_json::json!({"langCode": "EN"})
        );
        assert_eq!(
            json(&Agency::CountryCode("JP".to_string())),
            serde_json::json!({"countryCode": "JP"})
        );
        assert_eq!(
            json(&Agency::Name("ISBN Agency".to_string())),
            serde_json::json!({"name": "ISBN Agency"})
        );
        assert_eq!(json(&Agency::Unspecified), serde_json::json!({}));
    }
}
