//! Cognito user-pool identity adapter.

mod dto;
mod http_provider;

pub use http_provider::{CognitoHttpProvider, cognito_endpoint};
