//! Remote data storage capability port.

use async_trait::async_trait;

/// Database capability of a backend.
///
/// Only initialisation is part of the contract today.
#[async_trait]
pub trait Database: Send + Sync {
    /// Prepare the capability. Called once by the backend-system facade.
    async fn initialize(&self);
}
