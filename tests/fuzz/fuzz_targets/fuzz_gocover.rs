#![no_main]
use libfuzzer_sys::fuzz_target;
use newcov::module::Module;
use newcov::parsers::gocover;

fuzz_target!(|data: &[u8]| {
    // Profile parser must not panic on any input.
    let text = String::from_utf8_lossy(data);
    let _ = gocover::parse(&text, &Module::new("example.com/fuzz"));
});
