//! Reqwest-backed Firebase identity toolkit adapter.
//!
//! Calls `accounts:signUp`, `accounts:signInWithPassword` and
//! `accounts:delete` with the project API key as a query parameter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::dto::{
    DeleteBody, ErrorEnvelopeDto, SignInBody, SignInResponseDto, SignUpBody, SignUpResponseDto,
};
use crate::domain::ports::{
    AuthTokens, IdentityProvider, IdentityProviderError, PasswordAuthRequest, RegistrationOutcome,
    RegistrationRequest,
};
use crate::outbound::http_support::{
    build_client, classify_status, map_transport_error, status_message,
};

/// Public identity toolkit base URL.
pub const FIREBASE_DEFAULT_BASE: &str = "https://identitytoolkit.googleapis.com/v1/";
const USER_AGENT: &str = concat!("baas-firebase/", env!("CARGO_PKG_VERSION"));

/// Firebase adapter bound to one project API key.
pub struct FirebaseHttpProvider {
    client: Client,
    base: Url,
    api_key: String,
}

impl FirebaseHttpProvider {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// A trailing slash is added to `base` when missing so relative joins keep
    /// the version path segment.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        mut base: Url,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client: build_client(timeout, USER_AGENT)?,
            base,
            api_key: api_key.into(),
        })
    }

    fn method_url(&self, method: &str) -> Result<Url, IdentityProviderError> {
        // `accounts:x` alone would parse as a URL with scheme `accounts`.
        let mut url = self.base.join(&format!("./accounts:{method}")).map_err(|error| {
            IdentityProviderError::invalid_request(format!("invalid {method} url: {error}"))
        })?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, IdentityProviderError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = self.method_url(method)?;
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|error| map_transport_error(&error))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| map_transport_error(&error))?;
        if !status.is_success() {
            return Err(map_error_response(status, body.as_ref()));
        }
        serde_json::from_slice(body.as_ref()).map_err(|error| {
            IdentityProviderError::decode(format!("invalid {method} payload: {error}"))
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseHttpProvider {
    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationOutcome, IdentityProviderError> {
        let reply: SignUpResponseDto = self.call("signUp", &SignUpBody::new(request)).await?;
        Ok(reply.into_outcome(StatusCode::OK.as_u16()))
    }

    async fn authenticate(
        &self,
        request: &PasswordAuthRequest,
    ) -> Result<AuthTokens, IdentityProviderError> {
        let reply: SignInResponseDto = self
            .call("signInWithPassword", &SignInBody::new(request))
            .await?;
        reply.into_tokens()
    }

    async fn delete_account(&self, tokens: &AuthTokens) -> Result<(), IdentityProviderError> {
        let body = DeleteBody {
            id_token: tokens.id_token.as_str(),
        };
        let _: serde_json::Value = self.call("delete", &body).await?;
        Ok(())
    }
}

fn map_error_response(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    let envelope = serde_json::from_slice::<ErrorEnvelopeDto>(body).ok();
    let Some((code, details)) = envelope.as_ref().and_then(ErrorEnvelopeDto::code_and_details)
    else {
        return classify_status(status, status_message(status, body));
    };
    let message = details.unwrap_or(code).to_owned();
    if code.starts_with("TOO_MANY_ATTEMPTS") || code == "QUOTA_EXCEEDED" {
        return IdentityProviderError::rate_limited(message);
    }
    if status.is_server_error() {
        return IdentityProviderError::transport(format!("{code}: {message}"));
    }
    IdentityProviderError::rejected(code, message)
}
