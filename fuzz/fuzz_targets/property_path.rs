#![no_main]

use libfuzzer_sys::fuzz_target;
use propscope::PropertyTokenizer;

fuzz_target!(|data: &[u8]| {
    if let Ok(path) = std::str::from_utf8(data) {
        for step in PropertyTokenizer::new(path).steps() {
            assert!(step.indexed_name().starts_with(step.name()));
        }
    }
});
