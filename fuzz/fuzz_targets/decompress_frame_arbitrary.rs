#![no_main]
use libfuzzer_sys::fuzz_target;

use zstd::FrameDecoder;

fuzz_target!(|data: &[u8]| {
    // Errors are expected; panics and runaway allocation are not.
    let _ = zstd::decompress_frame_to_vec(data, None);

    // Drive the buffer protocol with a chunk size taken from the input so
    // partial fills and drains are covered too.
    let Some((&step, mut input)) = data.split_first() else { return };
    let step = usize::from(step).max(1);
    let mut decoder = FrameDecoder::new();
    loop {
        let pending = decoder.write_len();
        if pending > 0 {
            let half = (pending + 1) / 2;
            if decoder.write_consume(half).is_err() {
                break;
            }
            continue;
        }
        if decoder.is_done() {
            break;
        }
        let n = decoder.read_len().min(step).min(input.len());
        if n == 0 {
            break;
        }
        decoder.read_buffer()[..n].copy_from_slice(&input[..n]);
        input = &input[n..];
        if decoder.read_consume(n).is_err() {
            assert_eq!(decoder.read_len(), 0);
            assert!(!decoder.is_done());
            break;
        }
    }
});
