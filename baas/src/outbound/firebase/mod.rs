//! Firebase identity toolkit adapter.

mod dto;
mod http_provider;

pub use http_provider::{FIREBASE_DEFAULT_BASE, FirebaseHttpProvider};
