//! Accounts capability port and its notifications.

use async_trait::async_trait;

use crate::domain::{Listeners, Response, User};

/// The four notifications raised by an Accounts capability.
///
/// Each list delivers the affected [`User`] synchronously, in registration
/// order, after the state change it announces.
#[derive(Debug, Default)]
pub struct AccountsEvents {
    /// Raised after a successful sign-up.
    pub user_created: Listeners<User>,
    /// Raised after an account is deleted.
    pub user_deleted: Listeners<User>,
    /// Raised after a successful sign-in.
    pub user_signed_in: Listeners<User>,
    /// Raised after the in-memory user is signed out.
    pub user_signed_out: Listeners<User>,
}

impl AccountsEvents {
    /// Empty notification lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Account management capability of a backend.
///
/// Remote-facing operations report failures through [`Response`] and never
/// return errors.
#[async_trait]
pub trait Accounts: Send + Sync {
    /// Prepare the capability. Called once by the backend-system facade.
    async fn initialize(&self);

    /// Whether a user is currently known.
    fn has_user(&self) -> bool;

    /// Snapshot of the current user, if any.
    fn user(&self) -> Option<User>;

    /// Sign a new account up.
    async fn user_create(&self, email: &str, password: &str, nickname: &str) -> Response;

    /// Sign an existing account in; `data` carries the identity token.
    async fn user_sign_in(&self, email: &str, password: &str) -> Response;

    /// Forget the in-memory user.
    async fn user_sign_out(&self) -> Response;

    /// Delete the signed-in account at the provider.
    async fn user_delete(&self) -> Response;

    /// Notification lists listeners subscribe to.
    fn events(&self) -> &AccountsEvents;
}
