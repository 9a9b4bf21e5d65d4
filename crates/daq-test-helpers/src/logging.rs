//! Test log output.

/// Routes `tracing` output through the test harness writer.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test_tracing() {
    let _installed = tracing_subscriber::fmt()
        .with_test_writer()
        .with_target(false)
        .try_init()
        .is_ok();
}
