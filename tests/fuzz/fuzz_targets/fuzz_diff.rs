#![no_main]
use libfuzzer_sys::fuzz_target;
use newcov::diff::{parse_diff, DiffContext};
use newcov::language::GO;
use newcov::module::Module;

fuzz_target!(|data: &[u8]| {
    // Diff parser must not panic on any input.
    if let Ok(s) = std::str::from_utf8(data) {
        let module = Module::new("example.com/fuzz");
        let _ = parse_diff(s, DiffContext { module: &module, kind: &GO });
    }
});
