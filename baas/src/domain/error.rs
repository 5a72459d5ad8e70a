//! Programmer-error conditions raised by the backend-system facade.
//!
//! Business failures never use these types; they travel as
//! [`crate::domain::Response`] values instead.

use thiserror::Error;
use uuid::Uuid;

/// A backend system was used before its initialisation completed.
///
/// Identifies the offending facade by name and by its per-instance id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("backend system '{system}' ({instance}) accessed before initialisation")]
pub struct NotInitializedError {
    /// Name of the backend system.
    pub system: String,
    /// Unique identifier of the facade instance.
    pub instance: Uuid,
}

impl NotInitializedError {
    /// Build the error for a named facade instance.
    pub fn new(system: impl Into<String>, instance: Uuid) -> Self {
        Self {
            system: system.into(),
            instance,
        }
    }
}
