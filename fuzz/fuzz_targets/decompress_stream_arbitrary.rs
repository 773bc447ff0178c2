#![no_main]
use libfuzzer_sys::fuzz_target;

use zstd::io::Prefs;

fuzz_target!(|data: &[u8]| {
    let mut out = Vec::new();
    let _ = zstd::decompress_stream(data, &mut out, &Prefs::default());
});
