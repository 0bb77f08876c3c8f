#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = clipsweeper::arbitrary::arbtests::offset_paths(&mut Unstructured::new(data));
});
