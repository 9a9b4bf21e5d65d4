//! Timestamp helpers as seen by dependent crates.

use daq_core::now_millis;

#[test]
fn test_now_millis_is_exported_at_crate_root() {
    let before = daq_core::prelude::now_millis();
    let after = now_millis();
    assert!(after >= before);
    assert!(after - before < 60_000);
}
