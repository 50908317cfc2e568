#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(seq) = seqlabel_io::parse_tabular_str(text) {
            assert_eq!(seq.states.len(), seq.observations.len());
        }
    }
});
