#![no_main]
use libfuzzer_sys::fuzz_target;
use seqlabel_ml::HmmModel;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(spec) = seqlabel_io::model_file::model_spec_from_str(text) {
            let _ = HmmModel::new(&spec);
        }
    }
});
