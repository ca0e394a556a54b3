//! Application configuration module.
//!
//! Manages TOML-based config files for user settings such as the
//! search debounce interval and trending strip size.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::AppConfig;
pub use paths::resolve_config_path;
