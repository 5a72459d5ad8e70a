//! Reqwest-backed Cognito identity provider adapter.
//!
//! Speaks the unauthenticated subset of the Cognito user-pool API
//! (`SignUp`, `InitiateAuth`, `DeleteUser`) over JSON 1.1. This adapter owns
//! transport details only: request serialisation, timeout and HTTP error
//! mapping, and JSON decoding into domain outcomes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::dto::{
    DeleteUserBody, ErrorDto, InitiateAuthBody, InitiateAuthResponseDto, SignUpBody,
    SignUpResponseDto,
};
use crate::domain::ports::{
    AuthTokens, IdentityProvider, IdentityProviderError, PasswordAuthRequest, RegistrationOutcome,
    RegistrationRequest,
};
use crate::outbound::http_support::{
    build_client, classify_status, map_transport_error, status_message,
};

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const CONTENT_TYPE: &str = "application/x-amz-json-1.1";
const USER_AGENT: &str = concat!("baas-cognito/", env!("CARGO_PKG_VERSION"));

/// Regional Cognito identity provider endpoint.
///
/// # Errors
///
/// Returns an error when `region` does not form a valid host name.
pub fn cognito_endpoint(region: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("https://cognito-idp.{region}.amazonaws.com/"))
}

/// Cognito adapter performing JSON 1.1 POST requests against one endpoint.
pub struct CognitoHttpProvider {
    client: Client,
    endpoint: Url,
    client_id: String,
}

impl CognitoHttpProvider {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        client_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout, USER_AGENT)?,
            endpoint,
            client_id: client_id.into(),
        })
    }

    async fn call<B, R>(&self, operation: &str, body: &B) -> Result<R, IdentityProviderError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|error| {
            IdentityProviderError::invalid_request(format!("cannot encode {operation}: {error}"))
        })?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("X-Amz-Target", format!("{TARGET_PREFIX}.{operation}"))
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .body(payload)
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
        decode(operation, body.as_ref())
    }
}

#[async_trait]
impl IdentityProvider for CognitoHttpProvider {
    async fn register(
        &self,
        request: &RegistrationRequest,
    ) -> Result<RegistrationOutcome, IdentityProviderError> {
        let body = SignUpBody::new(&self.client_id, request);
        let reply: SignUpResponseDto = self.call("SignUp", &body).await?;
        Ok(reply.into_outcome(StatusCode::OK.as_u16()))
    }

    async fn authenticate(
        &self,
        request: &PasswordAuthRequest,
    ) -> Result<AuthTokens, IdentityProviderError> {
        let body = InitiateAuthBody::new(&self.client_id, request);
        let reply: InitiateAuthResponseDto = self.call("InitiateAuth", &body).await?;
        reply.into_tokens()
    }

    async fn delete_account(&self, tokens: &AuthTokens) -> Result<(), IdentityProviderError> {
        let body = DeleteUserBody {
            access_token: tokens.access_token.as_str(),
        };
        let _: serde_json::Value = self.call("DeleteUser", &body).await?;
        Ok(())
    }
}

fn decode<R: DeserializeOwned>(operation: &str, body: &[u8]) -> Result<R, IdentityProviderError> {
    // DeleteUser answers with an empty body.
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"{}"
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|error| {
        IdentityProviderError::decode(format!("invalid {operation} payload: {error}"))
    })
}

fn map_error_response(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    let decoded = serde_json::from_slice::<ErrorDto>(body).ok();
    let Some(code) = decoded.as_ref().and_then(ErrorDto::code) else {
        return classify_status(status, status_message(status, body));
    };
    let message = decoded
        .as_ref()
        .and_then(ErrorDto::message)
        .unwrap_or(code)
        .to_owned();
    match code {
        "TooManyRequestsException" | "LimitExceededException" | "TooManyFailedAttemptsException" => {
            IdentityProviderError::rate_limited(message)
        }
        _ if status.is_server_error() => {
            IdentityProviderError::transport(format!("{code}: {message}"))
        }
        _ => IdentityProviderError::rejected(code, message),
    }
}
