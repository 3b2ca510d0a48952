//! Fuzz target for host target parsing (`host`, `host:port`, `[v6]:port`).
//!
//! Goal: The parser should **never panic**, and an accepted target never has port 0.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_host_target
//! ```

#![no_main]

use hostaudit_session::HostTarget;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(target) = HostTarget::parse(text, 22) {
            assert_ne!(target.port, 0);
        }
    }
});
