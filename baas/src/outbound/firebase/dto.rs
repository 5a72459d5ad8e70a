//! Firebase identity toolkit REST payloads.

use serde::{Deserialize, Serialize};

use crate::domain::ports::{
    AuthTokens, IdentityProviderError, NICKNAME_ATTRIBUTE, PasswordAuthRequest,
    RegistrationOutcome, RegistrationRequest,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
    return_secure_token: bool,
}

impl<'a> SignUpBody<'a> {
    /// Firebase has no custom attributes on sign-up; the nickname becomes the
    /// display name and the remaining attributes are dropped.
    pub(super) fn new(request: &'a RegistrationRequest) -> Self {
        Self {
            email: request.username.as_str(),
            password: request.password.as_str(),
            display_name: request.attribute(NICKNAME_ATTRIBUTE),
            return_secure_token: true,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SignInBody<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

impl<'a> SignInBody<'a> {
    pub(super) fn new(request: &'a PasswordAuthRequest) -> Self {
        Self {
            email: request.username.as_str(),
            password: request.password.as_str(),
            return_secure_token: true,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DeleteBody<'a> {
    pub(super) id_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SignUpResponseDto {
    local_id: Option<String>,
}

impl SignUpResponseDto {
    /// Firebase signs the new account in straight away, so it is confirmed.
    pub(super) fn into_outcome(self, status: u16) -> RegistrationOutcome {
        RegistrationOutcome {
            status,
            user_confirmed: true,
            user_sub: self.local_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SignInResponseDto {
    id_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<String>,
}

impl SignInResponseDto {
    /// Firebase uses the id token for account calls, so it doubles as the
    /// access token.
    pub(super) fn into_tokens(self) -> Result<AuthTokens, IdentityProviderError> {
        let id_token = self
            .id_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| IdentityProviderError::decode("sign-in response missing idToken"))?;
        let expires_in = self
            .expires_in
            .map(|raw| {
                raw.parse::<u64>().map_err(|error| {
                    IdentityProviderError::decode(format!("invalid expiresIn {raw:?}: {error}"))
                })
            })
            .transpose()?;
        Ok(AuthTokens {
            access_token: id_token.clone(),
            id_token,
            refresh_token: self.refresh_token,
            expires_in,
        })
    }
}

/// `{ "error": { "code": 400, "message": "EMAIL_EXISTS" } }`
#[derive(Debug, Deserialize)]
pub(super) struct ErrorEnvelopeDto {
    error: ErrorDto,
}

#[derive(Debug, Deserialize)]
struct ErrorDto {
    message: Option<String>,
}

impl ErrorEnvelopeDto {
    /// Split `"CODE : details"` into its code and optional details.
    pub(super) fn code_and_details(&self) -> Option<(&str, Option<&str>)> {
        let raw = self.error.message.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        Some(match raw.split_once(':') {
            Some((code, details)) => {
                let details = details.trim();
                (code.trim(), (!details.is_empty()).then_some(details))
            }
            None => (raw, None),
        })
    }
}
