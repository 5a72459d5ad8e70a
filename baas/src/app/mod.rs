//! Application composition: settings and backend wiring.

pub mod config;
pub mod wiring;

pub use config::BaasSettings;
pub use wiring::{BaasSystem, BackendProvider, SettingsError, assemble, build_backend_system};
