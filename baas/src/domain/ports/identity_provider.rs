//! Driven port for the remote identity service.
//!
//! The domain owns the request shapes and outcome contracts so the identity
//! client stays agnostic of which provider (Cognito, Firebase, a test double)
//! sits behind it. Exact wire schemas belong to the adapters.

use std::fmt;

use async_trait::async_trait;
use zeroize::Zeroizing;

use super::define_port_error;

/// Attribute name carrying the user's nickname.
pub const NICKNAME_ATTRIBUTE: &str = "nickname";
/// Attribute name carrying the application version tag.
pub const APP_VERSION_ATTRIBUTE: &str = "custom:app_version";

/// A `{name, value}` pair attached to a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAttribute {
    /// Attribute name as the provider expects it.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

impl UserAttribute {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Registration request: email as username, password and attributes.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Username; always the account email.
    pub username: String,
    /// Account password.
    pub password: Zeroizing<String>,
    /// Extra attributes (nickname, app version).
    pub attributes: Vec<UserAttribute>,
}

impl RegistrationRequest {
    /// Value of the named attribute, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .map(|attribute| attribute.value.as_str())
    }
}

impl fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("attributes", &self.attributes)
            .finish()
    }
}

/// Provider reply to a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    /// HTTP-style status reported by the provider.
    pub status: u16,
    /// Whether the provider already considers the account confirmed.
    pub user_confirmed: bool,
    /// Provider-side subject identifier, when returned.
    pub user_sub: Option<String>,
}

impl RegistrationOutcome {
    /// Whether the provider reported an OK status.
    #[must_use]
    pub const fn is_ok_status(&self) -> bool {
        self.status == 200
    }
}

/// Password-based authentication request.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordAuthRequest {
    /// Username; the account email.
    pub username: String,
    /// Account password.
    pub password: Zeroizing<String>,
}

impl fmt::Debug for PasswordAuthRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordAuthRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Tokens returned by a successful authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthTokens {
    /// Identity token handed back to callers.
    pub id_token: String,
    /// Access token used for follow-up account operations.
    pub access_token: String,
    /// Refresh token, when issued.
    pub refresh_token: Option<String>,
    /// Lifetime of the tokens in seconds, when reported.
    pub expires_in: Option<u64>,
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("id_token", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

define_port_error! {
    /// Errors surfaced while calling the identity provider.
    pub enum IdentityProviderError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "identity provider transport failed: {message}",
        /// The call exceeded the configured timeout.
        Timeout { message: String } =>
            "identity provider timeout: {message}",
        /// The provider throttled the request.
        RateLimited { message: String } =>
            "identity provider rate limited request: {message}",
        /// The provider rejected the request (duplicate user, bad password, ...).
        Rejected { code: String, message: String } =>
            "{code}: {message}",
        /// Authentication needs an extra challenge this client cannot answer.
        ChallengeRequired { challenge: String } =>
            "identity provider requires challenge {challenge}",
        /// The provider response could not be decoded.
        Decode { message: String } =>
            "identity provider response decode failed: {message}",
        /// The adapter rejected the request before execution.
        InvalidRequest { message: String } =>
            "identity provider request invalid: {message}",
    }
}

impl IdentityProviderError {
    /// Return whether retrying this error is expected to help.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

/// Port over the remote identity service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account.
    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationOutcome, IdentityProviderError>;

    /// Authenticate with username and password.
    async fn authenticate(
        &self,
        request: &PasswordAuthRequest,
    ) -> Result<AuthTokens, IdentityProviderError>;

    /// Delete the account owning `tokens`.
    async fn delete_account(&self, tokens: &AuthTokens) -> Result<(), IdentityProviderError>;
}

/// Fixture provider that accepts every request and returns fixed tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureIdentityProvider;

/// Identity token returned by [`FixtureIdentityProvider`].
pub const FIXTURE_ID_TOKEN: &str = "fixture-id-token";

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn register(
        &self,
        _request: &RegistrationRequest,
    ) -> Result<RegistrationOutcome, IdentityProviderError> {
        Ok(RegistrationOutcome {
            status: 200,
            user_confirmed: true,
            user_sub: None,
        })
    }

    async fn authenticate(
        &self,
        _request: &PasswordAuthRequest,
    ) -> Result<AuthTokens, IdentityProviderError> {
        Ok(AuthTokens {
            id_token: FIXTURE_ID_TOKEN.to_owned(),
            access_token: "fixture-access-token".to_owned(),
            refresh_token: None,
            expires_in: Some(3600),
        })
    }

    async fn delete_account(&self, _tokens: &AuthTokens) -> Result<(), IdentityProviderError> {
        Ok(())
    }
}
