//! Logger installation.
//!
//! Native builds log through `env_logger` (`RUST_LOG` controls the filter);
//! browser builds forward to the devtools console and route panics there too.

/// Installs the platform logger. Safe to call more than once; later calls are
/// ignored.
#[cfg(not(target_arch = "wasm32"))]
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

#[cfg(target_arch = "wasm32")]
pub fn init() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already installed");
    }
}
