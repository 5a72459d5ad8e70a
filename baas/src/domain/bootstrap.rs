//! Account bootstrap flow: initialise the backend, then sign up and sign in.
//!
//! The flow owns the [`AccountState`]. Every transition is recorded and
//! pushed synchronously to the presentation [`StatusSink`].
//!
//! When sign-up fails the flow still attempts sign-in, so an account that
//! already exists at the provider can be signed into with the same
//! credentials.

use tracing::{debug, info, warn};

use crate::domain::ports::{Accounts, CloudCode, Database, StatusSink};
use crate::domain::{AccountCredentials, AccountState, BackendSystem, Response, User};

/// Outcome of one [`AccountBootstrap::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Sign-up response, when sign-up was attempted.
    pub sign_up: Option<Response>,
    /// Sign-in response, when sign-in was attempted.
    pub sign_in: Option<Response>,
    /// User read back after the flow.
    pub user: Option<User>,
    /// State the flow ended in.
    pub final_state: AccountState,
}

/// Drives the account lifecycle against a backend system.
pub struct AccountBootstrap<'a, A, C, D> {
    system: &'a BackendSystem<A, C, D>,
    sink: &'a dyn StatusSink,
    state: AccountState,
    transitions: Vec<AccountState>,
    listeners_registered: bool,
}

impl<'a, A, C, D> AccountBootstrap<'a, A, C, D>
where
    A: Accounts + 'static,
    C: CloudCode + 'static,
    D: Database + 'static,
{
    /// Start in [`AccountState::Null`] and show it on the sink.
    pub fn new(system: &'a BackendSystem<A, C, D>, sink: &'a dyn StatusSink) -> Self {
        let flow = Self {
            system,
            sink,
            state: AccountState::Null,
            transitions: Vec::new(),
            listeners_registered: false,
        };
        flow.sink
            .set_status(&flow.state.status_text(flow.system.name()));
        flow
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> AccountState {
        self.state
    }

    /// Every state entered since construction, in order.
    #[must_use]
    pub fn transitions(&self) -> &[AccountState] {
        &self.transitions
    }

    /// Initialise the backend and, if no user is known, sign up then sign in.
    pub async fn run(&mut self, credentials: &AccountCredentials) -> BootstrapReport {
        self.register_listeners();
        self.system.initialize().await;

        let system = self.system;
        let accounts = system.accounts();
        let mut report = BootstrapReport::default();

        if accounts.has_user() {
            debug!("user already known; skipping sign-up and sign-in");
        } else {
            self.transition(AccountState::SigningUp);
            let created = accounts
                .user_create(
                    credentials.email(),
                    credentials.password(),
                    credentials.nickname(),
                )
                .await;
            log_response("user create", &created);
            if created.is_success() {
                self.transition(AccountState::SignedUp);
            }

            self.transition(AccountState::SigningIn);
            let signed_in = accounts
                .user_sign_in(credentials.email(), credentials.password())
                .await;
            log_response("user sign in", &signed_in);
            if signed_in.is_success() {
                self.transition(AccountState::SignedIn);
            }

            report.sign_up = Some(created);
            report.sign_in = Some(signed_in);
        }

        report.user = accounts.user();
        match &report.user {
            Some(user) => info!(
                email = %user.email(),
                token_known = user.has_token(),
                "bootstrap finished"
            ),
            None => warn!("bootstrap finished without a user"),
        }
        report.final_state = self.state;
        report
    }

    /// Sign the current user out.
    pub async fn sign_out(&mut self) -> Response {
        self.transition(AccountState::SigningOut);
        let response = self.system.accounts().user_sign_out().await;
        log_response("user sign out", &response);
        if response.is_success() {
            self.transition(AccountState::SignedOut);
        }
        response
    }

    fn transition(&mut self, next: AccountState) {
        self.state = next;
        self.transitions.push(next);
        self.sink.set_status(&next.status_text(self.system.name()));
    }

    fn register_listeners(&mut self) {
        if self.listeners_registered {
            return;
        }
        self.listeners_registered = true;

        self.system
            .on_initialized()
            .add_listener(|system| info!(system = %system.name(), "backend initialised"));
        let events = self.system.accounts().events();
        events
            .user_created
            .add_listener(|user: &User| info!(email = %user.email(), "user created"));
        events
            .user_deleted
            .add_listener(|user: &User| info!(email = %user.email(), "user deleted"));
        events
            .user_signed_in
            .add_listener(|user: &User| info!(email = %user.email(), "user signed in"));
        events
            .user_signed_out
            .add_listener(|user: &User| info!(email = %user.email(), "user signed out"));
    }
}

fn log_response(operation: &str, response: &Response) {
    if response.is_success() {
        info!(operation, "succeeded");
    } else {
        warn!(operation, error = %response.error_message(), "failed");
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{AccountsEvents, NullStatusSink};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct Unit;

    #[async_trait]
    impl CloudCode for Unit {
        async fn initialize(&self) {}
    }

    #[async_trait]
    impl Database for Unit {
        async fn initialize(&self) {}
    }

    #[derive(Default)]
    struct KnownUser {
        events: AccountsEvents,
        contacted: AtomicBool,
    }

    #[async_trait]
    impl Accounts for KnownUser {
        async fn initialize(&self) {}
        fn has_user(&self) -> bool {
            true
        }
        fn user(&self) -> Option<User> {
            Some(User::new("ada@example.com").with_token_id("cached"))
        }
        async fn user_create(&self, _e: &str, _p: &str, _n: &str) -> Response {
            self.contacted.store(true, Ordering::SeqCst);
            Response::success(None)
        }
        async fn user_sign_in(&self, _e: &str, _p: &str) -> Response {
            self.contacted.store(true, Ordering::SeqCst);
            Response::success(None)
        }
        async fn user_sign_out(&self) -> Response {
            Response::success(None)
        }
        async fn user_delete(&self) -> Response {
            Response::success(None)
        }
        fn events(&self) -> &AccountsEvents {
            &self.events
        }
    }

    #[tokio::test]
    async fn known_user_skips_sign_up_and_sign_in() {
        let system = BackendSystem::new("Test", KnownUser::default(), Unit, Unit);
        let sink = NullStatusSink;
        let mut flow = AccountBootstrap::new(&system, &sink);

        let report = flow.run(&AccountCredentials::test_account()).await;

        assert!(flow.transitions().is_empty());
        assert_eq!(report.final_state, AccountState::Null);
        assert!(report.sign_up.is_none() && report.sign_in.is_none());
        let user = report.user.expect("known user is reported");
        assert_eq!(user.token_id(), Some("cached"));
        assert!(!system.accounts().contacted.load(Ordering::SeqCst));
        assert!(system.is_initialized());
    }

    #[tokio::test]
    async fn repeated_runs_register_listeners_once() {
        let system = BackendSystem::new("Test", KnownUser::default(), Unit, Unit);
        let sink = NullStatusSink;
        let mut flow = AccountBootstrap::new(&system, &sink);

        flow.run(&AccountCredentials::test_account()).await;
        flow.run(&AccountCredentials::test_account()).await;

        assert_eq!(system.accounts().events().user_created.len(), 1);
        assert_eq!(system.on_initialized().len(), 1);
    }

    #[tokio::test]
    async fn sign_out_drives_signing_out_then_signed_out() {
        let system = BackendSystem::new("Test", KnownUser::default(), Unit, Unit);
        let sink = NullStatusSink;
        let mut flow = AccountBootstrap::new(&system, &sink);

        assert!(flow.sign_out().await.is_success());

        assert_eq!(
            flow.transitions(),
            &[AccountState::SigningOut, AccountState::SignedOut]
        );
    }
}
