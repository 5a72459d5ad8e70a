//! Backend-system facade composing the three capabilities.
//!
//! One generic facade replaces per-provider singletons: the capability set is
//! chosen when the facade is constructed and the instance is handed to
//! collaborators explicitly.
//!
//! Lifecycle: `Uninitialized -> Initializing -> Initialized`. The first call
//! to [`BackendSystem::initialize`] claims the transition; every later call is
//! a no-op. Capabilities initialise strictly in order Accounts, CloudCode,
//! Database, and the "initialized" notification fires after all three.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::ports::{Accounts, CloudCode, Database};
use crate::domain::{Listeners, NotInitializedError};

const UNINITIALIZED: u8 = 0;
const INITIALIZING: u8 = 1;
const INITIALIZED: u8 = 2;

/// Facade over an Accounts/CloudCode/Database capability set.
///
/// Capabilities are created before the facade so listeners can subscribe
/// before initialisation; construction performs no I/O.
pub struct BackendSystem<A, C, D> {
    name: String,
    instance: Uuid,
    state: AtomicU8,
    accounts: A,
    cloud_code: C,
    database: D,
    on_initialized: Listeners<Self>,
}

impl<A, C, D> BackendSystem<A, C, D>
where
    A: Accounts,
    C: CloudCode,
    D: Database,
{
    /// Compose a facade named `name` from its capabilities.
    pub fn new(name: impl Into<String>, accounts: A, cloud_code: C, database: D) -> Self {
        Self {
            name: name.into(),
            instance: Uuid::new_v4(),
            state: AtomicU8::new(UNINITIALIZED),
            accounts,
            cloud_code,
            database,
            on_initialized: Listeners::new(),
        }
    }

    /// Initialise every capability once, in order, then notify listeners.
    ///
    /// Idempotent: only the first call does any work.
    pub async fn initialize(&self) {
        if self
            .state
            .compare_exchange(
                UNINITIALIZED,
                INITIALIZING,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            debug!(system = %self.name, "initialisation already claimed");
            return;
        }

        debug!(system = %self.name, capability = "accounts", "initialising");
        self.accounts.initialize().await;
        debug!(system = %self.name, capability = "cloud_code", "initialising");
        self.cloud_code.initialize().await;
        debug!(system = %self.name, capability = "database", "initialising");
        self.database.initialize().await;

        self.state.store(INITIALIZED, Ordering::Release);
        info!(system = %self.name, instance = %self.instance, "backend system initialised");
        self.on_initialized.invoke(self);
    }

    /// Fail when initialisation has not completed.
    ///
    /// Using this guard is optional; the facade does not enforce it itself.
    ///
    /// # Errors
    ///
    /// Returns [`NotInitializedError`] naming this instance before
    /// [`Self::initialize`] has finished.
    pub fn require_is_initialized(&self) -> Result<(), NotInitializedError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(NotInitializedError::new(self.name.as_str(), self.instance))
        }
    }

    /// Whether initialisation has completed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.load(Ordering::Acquire) == INITIALIZED
    }

    /// Accounts capability.
    #[must_use]
    pub const fn accounts(&self) -> &A {
        &self.accounts
    }

    /// Cloud code capability.
    #[must_use]
    pub const fn cloud_code(&self) -> &C {
        &self.cloud_code
    }

    /// Database capability.
    #[must_use]
    pub const fn database(&self) -> &D {
        &self.database
    }

    /// Listeners notified with the facade once initialisation completes.
    #[must_use]
    pub const fn on_initialized(&self) -> &Listeners<Self> {
        &self.on_initialized
    }

    /// Facade name, also used as the status-text label.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Unique id of this facade instance.
    #[must_use]
    pub const fn instance_id(&self) -> Uuid {
        self.instance
    }
}

impl<A, C, D> fmt::Debug for BackendSystem<A, C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendSystem")
            .field("name", &self.name)
            .field("instance", &self.instance)
            .field("state", &self.state.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::AccountsEvents;
    use crate::domain::{Response, User};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    type Calls = Arc<Mutex<Vec<&'static str>>>;

    struct Probe {
        label: &'static str,
        calls: Calls,
        events: AccountsEvents,
    }

    impl Probe {
        fn new(label: &'static str, calls: &Calls) -> Self {
            Self {
                label,
                calls: Arc::clone(calls),
                events: AccountsEvents::new(),
            }
        }

        fn record(&self) {
            self.calls.lock().expect("calls lock").push(self.label);
        }
    }

    #[async_trait]
    impl Accounts for Probe {
        async fn initialize(&self) {
            tokio::task::yield_now().await;
            self.record();
        }
        fn has_user(&self) -> bool {
            false
        }
        fn user(&self) -> Option<User> {
            None
        }
        async fn user_create(&self, _e: &str, _p: &str, _n: &str) -> Response {
            Response::failure("unused")
        }
        async fn user_sign_in(&self, _e: &str, _p: &str) -> Response {
            Response::failure("unused")
        }
        async fn user_sign_out(&self) -> Response {
            Response::failure("unused")
        }
        async fn user_delete(&self) -> Response {
            Response::failure("unused")
        }
        fn events(&self) -> &AccountsEvents {
            &self.events
        }
    }

    #[async_trait]
    impl CloudCode for Probe {
        async fn initialize(&self) {
            self.record();
        }
    }

    #[async_trait]
    impl Database for Probe {
        async fn initialize(&self) {
            self.record();
        }
    }

    fn system(calls: &Calls) -> BackendSystem<Probe, Probe, Probe> {
        BackendSystem::new(
            "Probe",
            Probe::new("accounts", calls),
            Probe::new("cloud_code", calls),
            Probe::new("database", calls),
        )
    }

    #[tokio::test]
    async fn initialises_capabilities_in_order_exactly_once() {
        let calls = Calls::default();
        let system = system(&calls);
        let notified = Arc::new(Mutex::new(0_u32));
        let counter = Arc::clone(&notified);
        system.on_initialized().add_listener(move |facade| {
            assert!(facade.is_initialized());
            *counter.lock().expect("counter lock") += 1;
        });

        system.initialize().await;
        system.initialize().await;

        assert_eq!(
            *calls.lock().expect("calls lock"),
            vec!["accounts", "cloud_code", "database"]
        );
        assert_eq!(*notified.lock().expect("counter lock"), 1);
    }

    #[tokio::test]
    async fn guard_fails_until_initialised() {
        let system = system(&Calls::default());

        let err = system
            .require_is_initialized()
            .expect_err("guard must fail before initialisation");
        assert_eq!(err.system, "Probe");
        assert_eq!(err.instance, system.instance_id());

        system.initialize().await;
        assert!(system.require_is_initialized().is_ok());
    }

    #[tokio::test]
    async fn concurrent_initialisation_runs_capabilities_once() {
        let calls = Calls::default();
        let system = system(&calls);

        tokio::join!(system.initialize(), system.initialize());

        assert_eq!(calls.lock().expect("calls lock").len(), 3);
        assert!(system.is_initialized());
    }
}
