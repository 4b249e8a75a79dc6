use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Loads the configuration on first access when `init_config()` has not
/// been called yet.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::load()))
        .load_full()
}

/// Initialize the global configuration
///
/// Loads configuration from "config.toml" in the current directory,
/// overlaid by `TL__*` environment variables.
///
/// # Examples
/// ```no_run
/// use treasury_ledger::config::init_config;
/// init_config();
/// ```
pub fn init_config() {
    CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::load()));
}

/// Replace the global configuration
///
/// Used by tests and the CLI to point the process at another database.
pub fn update_config<F>(f: F)
where
    F: FnOnce(&mut StaticConfig),
{
    let slot = CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::load()));
    let mut next = (*slot.load_full()).clone();
    f(&mut next);
    slot.store(Arc::new(next));
}
