use std::sync::Once;

static INIT: Once = Once::new();

/// Installs an `env_logger` subscriber driven by `RUST_LOG`, at most once per
/// test binary. Tests that want to see `log::trace!`/`log::debug!` output
/// from the parser call this first; tests that don't care can skip it.
pub fn init_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
