//! Placeholder CloudCode and Database capabilities.
//!
//! Neither provider has a concrete capability yet; these record that they
//! were initialised and do nothing else.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{CloudCode, Database};

/// Cloud code capability with no remote behaviour.
#[derive(Debug, Default)]
pub struct PlaceholderCloudCode {
    initialized: AtomicBool,
}

impl PlaceholderCloudCode {
    /// Whether [`CloudCode::initialize`] has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }
}

#[async_trait]
impl CloudCode for PlaceholderCloudCode {
    async fn initialize(&self) {
        self.initialized.store(true, Ordering::Release);
        debug!(capability = "cloud_code", "placeholder initialised");
    }
}

/// Database capability with no remote behaviour.
#[derive(Debug, Default)]
pub struct PlaceholderDatabase {
    initialized: AtomicBool,
}

impl PlaceholderDatabase {
    /// Whether [`Database::initialize`] has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }
}

#[async_trait]
impl Database for PlaceholderDatabase {
    async fn initialize(&self) {
        self.initialized.store(true, Ordering::Release);
        debug!(capability = "database", "placeholder initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn placeholders_record_initialisation() {
        let cloud_code = PlaceholderCloudCode::default();
        let database = PlaceholderDatabase::default();
        assert!(!cloud_code.is_initialized() && !database.is_initialized());

        CloudCode::initialize(&cloud_code).await;
        Database::initialize(&database).await;

        assert!(cloud_code.is_initialized());
        assert!(database.is_initialized());
    }
}
