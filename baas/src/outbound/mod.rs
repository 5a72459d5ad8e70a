//! Outbound adapters implementing domain ports.

pub mod cognito;
pub mod firebase;
mod http_support;
pub mod placeholder;
