#![no_main]

use bookland::{FormatOptions, Hyphens, Isbn, Version};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let isbn = Isbn::parse(source);
    let options = FormatOptions::new()
        .with_versions([Version::Isbn10, Version::Isbn13])
        .with_hyphens_chain([Hyphens::Source, Hyphens::Disabled]);

    match isbn.format(&options) {
        // Formatted output must parse back as valid
        Ok(formatted) => assert!(Isbn::parse(&formatted).is_valid(), "{formatted}"),
        // Both chains end in an option that always applies
        Err(_) => assert!(!isbn.is_valid()),
    }
});
