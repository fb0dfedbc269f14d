#![no_main]

use bookland::{search_all, SearchOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    for isbn in search_all(&text, &SearchOptions::default()) {
        assert!(isbn.is_valid());
        assert!(text.contains(isbn.source()));
    }
});
