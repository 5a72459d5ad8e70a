//! Identity provider client: sign-up, sign-in and account deletion.
//!
//! Every provider failure, validation failure or timeout is converted into a
//! [`Response`]; nothing here returns an error to the caller. The client
//! tracks a single "user is logged in" flag which only sign-up and sign-in
//! ever set, and only ever to `true`.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::domain::auth::SignInCredentials;
use crate::domain::ports::{
    APP_VERSION_ATTRIBUTE, AuthTokens, IdentityProvider, IdentityProviderError,
    NICKNAME_ATTRIBUTE, PasswordAuthRequest, RegistrationRequest, UserAttribute,
};
use crate::domain::{CredentialsValidationError, Response};

/// Thin adapter over an [`IdentityProvider`] producing uniform responses.
pub struct IdentityProviderClient {
    provider: Arc<dyn IdentityProvider>,
    app_version: String,
    call_timeout: Option<Duration>,
    logged_in: AtomicBool,
    session: Mutex<Option<AuthTokens>>,
}

impl IdentityProviderClient {
    /// Build a client tagging registrations with `app_version`.
    pub fn new(provider: Arc<dyn IdentityProvider>, app_version: impl Into<String>) -> Self {
        Self {
            provider,
            app_version: app_version.into(),
            call_timeout: None,
            logged_in: AtomicBool::new(false),
            session: Mutex::new(None),
        }
    }

    /// Bound every provider call by `timeout`.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Whether a sign-up or sign-in has succeeded in this process.
    #[must_use]
    pub fn is_user_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::Acquire)
    }

    /// Whether tokens from a successful sign-in are held.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Drop the tokens held from the last sign-in without contacting the
    /// provider. The logged-in flag is left untouched.
    pub fn end_session(&self) {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Register a new account.
    ///
    /// Fails fast, without contacting the provider, when a user is already
    /// logged in or when any credential is empty.
    pub async fn sign_up(&self, email: &str, password: &str, nickname: &str) -> Response {
        if self.is_user_logged_in() {
            return reject_locally(
                "sign_up",
                "sign up failed: a user is already logged in".to_owned(),
            );
        }
        let credentials = match SignInCredentials::try_from_parts(email, password) {
            Ok(credentials) => credentials,
            Err(err) => return reject_locally("sign_up", format!("sign up failed: {err}")),
        };
        if nickname.trim().is_empty() {
            let err = CredentialsValidationError::EmptyNickname;
            return reject_locally("sign_up", format!("sign up failed: {err}"));
        }

        let request = RegistrationRequest {
            username: credentials.email().to_owned(),
            password: Zeroizing::new(credentials.password().to_owned()),
            attributes: vec![
                UserAttribute::new(NICKNAME_ATTRIBUTE, nickname),
                UserAttribute::new(APP_VERSION_ATTRIBUTE, self.app_version.as_str()),
            ],
        };

        match self.bounded(self.provider.register(&request)).await {
            Ok(outcome) => {
                if outcome.is_ok_status() {
                    self.logged_in.store(true, Ordering::Release);
                } else {
                    debug!(status = outcome.status, "registration returned non-OK status");
                }
                info!(
                    username = %request.username,
                    confirmed = outcome.user_confirmed,
                    "user registered"
                );
                Response::success(None)
            }
            Err(err) => provider_failure("sign_up", &err),
        }
    }

    /// Authenticate with email and password.
    ///
    /// On success the response data carries the identity token untouched.
    pub async fn sign_in(&self, email: &str, password: &str) -> Response {
        let credentials = match SignInCredentials::try_from_parts(email, password) {
            Ok(credentials) => credentials,
            Err(err) => return reject_locally("sign_in", format!("bad parameters: {err}")),
        };

        let request = PasswordAuthRequest {
            username: credentials.email().to_owned(),
            password: Zeroizing::new(credentials.password().to_owned()),
        };

        match self.bounded(self.provider.authenticate(&request)).await {
            Ok(tokens) => {
                let id_token = tokens.id_token.clone();
                *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(tokens);
                self.logged_in.store(true, Ordering::Release);
                info!(username = %request.username, "user signed in");
                Response::success(Some(id_token))
            }
            Err(err) => provider_failure("sign_in", &err),
        }
    }

    /// Delete the account owning the tokens from the last sign-in.
    ///
    /// The logged-in flag is left untouched.
    pub async fn delete_account(&self) -> Response {
        let tokens = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let Some(tokens) = tokens else {
            return reject_locally(
                "delete_account",
                "delete failed: no signed-in session".to_owned(),
            );
        };

        match self.bounded(self.provider.delete_account(&tokens)).await {
            Ok(()) => {
                *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
                info!("account deleted");
                Response::success(None)
            }
            Err(err) => provider_failure("delete_account", &err),
        }
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, IdentityProviderError>
    where
        F: Future<Output = Result<T, IdentityProviderError>>,
    {
        match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                Err(IdentityProviderError::timeout(format!(
                    "no reply within {}ms",
                    limit.as_millis()
                )))
            }),
            None => call.await,
        }
    }
}

fn reject_locally(operation: &'static str, message: String) -> Response {
    warn!(operation, reason = %message, "rejected before contacting provider");
    Response::failure(message)
}

fn provider_failure(operation: &'static str, err: &IdentityProviderError) -> Response {
    warn!(
        operation,
        kind = err.kind(),
        retryable = err.is_retryable(),
        error = %err,
        "identity provider call failed"
    );
    Response::failure(err.to_string())
}
