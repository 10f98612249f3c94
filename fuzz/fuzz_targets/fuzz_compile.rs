#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Compilation must absorb arbitrary input without panicking, and the
    // resulting tree must stay evaluable
    let query = sift::query::compile(data);
    let _ = query.exec("2024 ERROR occurred while reading feed");
    let _ = query.exec("");
});
