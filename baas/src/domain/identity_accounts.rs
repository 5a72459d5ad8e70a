//! Accounts capability backed by an identity provider.
//!
//! Keeps the current [`User`] in memory and raises the Accounts
//! notifications after each successful state change.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{Accounts, AccountsEvents};
use crate::domain::{IdentityProviderClient, Response, User};

/// [`Accounts`] implementation delegating to an [`IdentityProviderClient`].
pub struct IdentityAccounts {
    client: IdentityProviderClient,
    user: RwLock<Option<User>>,
    events: AccountsEvents,
    initialized: AtomicBool,
}

impl IdentityAccounts {
    /// Wrap a client. Listeners may subscribe immediately.
    #[must_use]
    pub fn new(client: IdentityProviderClient) -> Self {
        Self {
            client,
            user: RwLock::new(None),
            events: AccountsEvents::new(),
            initialized: AtomicBool::new(false),
        }
    }

    /// Underlying identity client.
    #[must_use]
    pub const fn client(&self) -> &IdentityProviderClient {
        &self.client
    }

    /// Whether [`Accounts::initialize`] has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    fn replace_user(&self, user: Option<User>) -> Option<User> {
        let mut guard = self.user.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, user)
    }
}

#[async_trait]
impl Accounts for IdentityAccounts {
    async fn initialize(&self) {
        self.initialized.store(true, Ordering::Release);
        debug!("identity accounts initialised");
    }

    fn has_user(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn user_create(&self, email: &str, password: &str, nickname: &str) -> Response {
        let response = self.client.sign_up(email, password, nickname).await;
        if response.is_success() {
            let user = User::new(email.trim());
            self.replace_user(Some(user.clone()));
            self.events.user_created.invoke(&user);
        }
        response
    }

    async fn user_sign_in(&self, email: &str, password: &str) -> Response {
        let response = self.client.sign_in(email, password).await;
        if response.is_success() {
            let mut user = User::new(email.trim());
            if let Some(token) = response.data() {
                user = user.with_token_id(token);
            }
            self.replace_user(Some(user.clone()));
            self.events.user_signed_in.invoke(&user);
        }
        response
    }

    async fn user_sign_out(&self) -> Response {
        let Some(user) = self.replace_user(None) else {
            return Response::failure("sign out failed: no user is signed in");
        };
        self.client.end_session();
        info!(email = %user.email(), "user signed out");
        self.events.user_signed_out.invoke(&user);
        Response::success(None)
    }

    async fn user_delete(&self) -> Response {
        if !self.has_user() {
            return Response::failure("delete failed: no user is signed in");
        }
        let response = self.client.delete_account().await;
        if response.is_success() {
            if let Some(user) = self.replace_user(None) {
                self.events.user_deleted.invoke(&user);
            }
        }
        response
    }

    fn events(&self) -> &AccountsEvents {
        &self.events
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        FIXTURE_ID_TOKEN, FixtureIdentityProvider, IdentityProviderError, MockIdentityProvider,
    };
    use rstest::{fixture, rstest};
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    #[fixture]
    fn accounts() -> IdentityAccounts {
        let client = IdentityProviderClient::new(Arc::new(FixtureIdentityProvider), "0.0.1");
        IdentityAccounts::new(client)
    }

    fn observe(accounts: &IdentityAccounts) -> Log {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let events = accounts.events();
        for (name, list) in [
            ("created", &events.user_created),
            ("deleted", &events.user_deleted),
            ("signed_in", &events.user_signed_in),
            ("signed_out", &events.user_signed_out),
        ] {
            let sink = Arc::clone(&log);
            list.add_listener(move |user: &User| {
                sink.lock()
                    .expect("log lock")
                    .push(format!("{name}:{}", user.email()));
            });
        }
        log
    }

    #[rstest]
    #[tokio::test]
    async fn create_then_sign_in_tracks_user_and_notifies(accounts: IdentityAccounts) {
        let log = observe(&accounts);
        assert!(!accounts.has_user());

        assert!(accounts.user_create("ada@example.com", "pw", "ada").await.is_success());
        assert_eq!(accounts.user().map(|u| u.has_token()), Some(false));

        let response = accounts.user_sign_in("ada@example.com", "pw").await;
        assert_eq!(response.data(), Some(FIXTURE_ID_TOKEN));

        let user = accounts.user().expect("user after sign-in");
        assert_eq!(user.token_id(), Some(FIXTURE_ID_TOKEN));
        assert_eq!(
            *log.lock().expect("log lock"),
            vec!["created:ada@example.com", "signed_in:ada@example.com"]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn listener_sees_state_change_already_applied() {
        let accounts = Arc::new(accounts());
        let seen = Arc::new(Mutex::new(None));
        let observed = Arc::clone(&accounts);
        let sink = Arc::clone(&seen);
        accounts.events().user_signed_in.add_listener(move |_user: &User| {
            *sink.lock().expect("lock") = Some(observed.has_user());
        });

        accounts.user_sign_in("ada@example.com", "pw").await;

        assert_eq!(*seen.lock().expect("lock"), Some(true));
    }

    #[rstest]
    #[tokio::test]
    async fn failed_operations_raise_no_notifications() {
        let mut mock = MockIdentityProvider::new();
        mock.expect_register()
            .returning(|_| Err(IdentityProviderError::rejected("UsernameExistsException", "duplicate")));
        mock.expect_authenticate()
            .returning(|_| Err(IdentityProviderError::rejected("NotAuthorizedException", "bad password")));
        let accounts =
            IdentityAccounts::new(IdentityProviderClient::new(Arc::new(mock), "0.0.1"));
        let log = observe(&accounts);

        assert!(!accounts.user_create("ada@example.com", "pw", "ada").await.is_success());
        assert!(!accounts.user_sign_in("ada@example.com", "pw").await.is_success());

        assert!(!accounts.has_user());
        assert!(log.lock().expect("log lock").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn sign_out_clears_user_and_session(accounts: IdentityAccounts) {
        let log = observe(&accounts);
        accounts.user_sign_in("ada@example.com", "pw").await;

        assert!(accounts.user_sign_out().await.is_success());

        assert!(!accounts.has_user());
        assert!(!accounts.client().has_session());
        assert!(accounts.client().is_user_logged_in());
        assert!(!accounts.user_sign_out().await.is_success());
        assert_eq!(
            log.lock().expect("log lock").last().map(String::as_str),
            Some("signed_out:ada@example.com")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn delete_requires_a_user_then_notifies(accounts: IdentityAccounts) {
        let log = observe(&accounts);
        assert!(!accounts.user_delete().await.is_success());

        accounts.user_sign_in("ada@example.com", "pw").await;
        assert!(accounts.user_delete().await.is_success());

        assert!(!accounts.has_user());
        assert_eq!(
            log.lock().expect("log lock").last().map(String::as_str),
            Some("deleted:ada@example.com")
        );
    }

    #[rstest]
    #[tokio::test]
    async fn initialize_marks_capability_ready(accounts: IdentityAccounts) {
        assert!(!accounts.is_initialized());
        accounts.initialize().await;
        assert!(accounts.is_initialized());
    }
}
