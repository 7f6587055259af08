#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as delimited input — must not panic.
    let _ = recupera::tabular::import_csv(data);
});
