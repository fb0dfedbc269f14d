//! Integration tests for parsing, validation and formatting without a
//! registration-group table.

use bookland::{
    parse, FormatError, FormatOptions, Hyphens, Isbn, ValidationError, Version, UNKNOWN_CHECKSUM,
};

#[test]
fn test_parse_fields() {
    let isbn = parse("978-4-10-212204-4");
    assert_eq!(isbn.source(), "978-4-10-212204-4");
    assert_eq!(isbn.version(), Version::Isbn13);
    assert_eq!(isbn.ean_prefix(), "978");
    assert_eq!(isbn.code(), "410212204");
    assert_eq!(isbn.checksum(), '4');

    let isbn = parse("410212204?");
    assert_eq!(isbn.version(), Version::Isbn10);
    assert_eq!(isbn.ean_prefix(), "978");
    assert_eq!(isbn.checksum(), UNKNOWN_CHECKSUM);
}

#[test]
fn test_validation_order() {
    // Ean prefix is checked before shape, shape before checksum
    assert_eq!(parse("977-abc").error(), Some(ValidationError::InvalidEanPrefix));
    assert_eq!(parse("978-abc-def-ghi-0").error(), Some(ValidationError::InvalidFormat));
    assert_eq!(parse("978-4-10-212204-0").error(), Some(ValidationError::InvalidChecksum));
    assert_eq!(parse("978-4-10-212204-4").error(), None);
}

#[test]
fn test_error_identifiers() {
    let errors: Vec<&str> = ["9784102122040", "977410212204?", "97841021220-4-"]
        .iter()
        .filter_map(|source| parse(source).error())
        .map(|error| error.as_str())
        .collect();
    assert_eq!(errors, vec!["invalid_checksum", "invalid_ean_prefix", "invalid_format"]);
}

#[test]
fn test_format_conversions() {
    assert_eq!(
        parse("9780385504201")
            .format(&FormatOptions::new().with_version(Version::Isbn10))
            .unwrap(),
        "0385504209"
    );
    assert_eq!(
        parse("0385504209").format(&FormatOptions::default()).unwrap(),
        "9780385504201"
    );
    assert_eq!(
        parse("669-999-999-0")
            .format(&FormatOptions::new().with_hyphens_chain([
                Hyphens::RegistrationGroup,
                Hyphens::Source
            ]))
            .unwrap(),
        "978-669-999-999-3"
    );
}

#[test]
fn test_format_errors() {
    let error = parse("2070408508").format(&FormatOptions::default()).unwrap_err();
    assert!(matches!(
        error,
        FormatError::InvalidSource {
            error: ValidationError::InvalidChecksum,
            ..
        }
    ));
    assert!(error.to_string().contains("2070408508"));

    let error = parse("9798565336375")
        .format(&FormatOptions::new().with_version(Version::Isbn10))
        .unwrap_err();
    assert_eq!(error, FormatError::IncompatibleVersion);
    assert!(error.to_string().contains("isbn13"));

    let error = parse("2070408507")
        .format(&FormatOptions::new().with_hyphens(Hyphens::Source))
        .unwrap_err();
    assert_eq!(error, FormatError::MissingOrInvalidHyphens);
}

#[test]
fn test_format_options_from_json() {
    let options: FormatOptions =
        serde_json::from_str(r#"{"version": ["isbn10", "isbn13"], "hyphens": [true, "source", false]}"#)
            .unwrap();
    let isbn = parse("979-10-90636-07-1");
    assert_eq!(isbn.format(&options).unwrap(), "979-10-90636-07-1");
    let isbn = parse("978-2-07-040850-4");
    assert_eq!(isbn.format(&options).unwrap(), "2-07-040850-7");
}

#[test]
fn test_validation_error_serializes_as_identifier() {
    let json = serde_json::to_string(&ValidationError::InvalidEanPrefix).unwrap();
    assert_eq!(json, "\"invalid_ean_prefix\"");
}

#[test]
fn test_parse_shorthand_matches_isbn_parse() {
    let a = parse("2-07-040850-7");
    let b = Isbn::parse("2-07-040850-7");
    assert_eq!(a.code(), b.code());
    assert_eq!(a.error(), b.error());
}

#[test]
fn test_isbn_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Isbn<'static>>();
}
