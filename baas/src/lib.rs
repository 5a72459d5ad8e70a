//! Backend-as-a-service library modules.
//!
//! The crate is a small hexagon: `domain` owns the capability ports, the
//! backend-system facade and the account bootstrap flow; `outbound` holds the
//! identity provider adapters; `inbound` holds the presentation collaborator;
//! `app` wires configuration to a concrete backend system.

pub mod app;
pub mod domain;
pub mod inbound;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
