//! Common test helpers and utilities shared across test suite.

use bookland::RegistrationGroups;

/// Path of the registration-group fixture table.
#[allow(dead_code)]
pub const FIXTURE_PATH: &str = "tests/data/registration_groups.json";

/// Loads the registration-group fixture table.
///
/// The fixture is a subset of the published table covering the groups the
/// integration tests hyphenate.
pub fn load_groups() -> RegistrationGroups {
    RegistrationGroups::from_path(FIXTURE_PATH).expect("Could not load fixture table")
}

/// Valid ISBNs of the fixture table with their canonical hyphenation.
#[allow(dead_code)]
pub const HYPHENATED: &[&str] = &[
    "0-330-28498-3",
    "1-58182-008-9",
    "2-226-05257-7",
    "3-7965-1900-8",
    "4-19-830127-1",
    "978-600-119-125-1",
    "978-621-96190-2-8",
    "978-65-5525-005-3",
    "7-301-10299-2",
    "80-85983-44-3",
    "92-67-10370-9",
    "978-92-95055-12-4",
    "978-92-95055-02-5",
    "978-99937-1-056-1",
    "979-10-90636-07-1",
    "979-11-86178-14-0",
    "979-12-200-0852-5",
    "979-8-6024-0545-3",
];
