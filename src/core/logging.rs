//! Logging setup for tools built on the engine

/// Install the global `env_logger` backend.
///
/// Defaults to `info` so scene loads, exports, and degenerate-transform
/// fallbacks are visible; set `RUST_LOG` to change the filter (e.g.
/// `RUST_LOG=rigkit=debug` to also see per-keyframe records).
///
/// # Example
/// ```
/// rigkit::core::logging::init();
/// log::info!("session ready");
/// ```
pub fn init() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();
}
