//! Cognito identity provider JSON 1.1 payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::ports::{
    AuthTokens, IdentityProviderError, PasswordAuthRequest, RegistrationOutcome,
    RegistrationRequest,
};

pub(super) const USER_PASSWORD_AUTH: &str = "USER_PASSWORD_AUTH";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct AttributeDto<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct SignUpBody<'a> {
    client_id: &'a str,
    username: &'a str,
    password: &'a str,
    user_attributes: Vec<AttributeDto<'a>>,
}

impl<'a> SignUpBody<'a> {
    pub(super) fn new(client_id: &'a str, request: &'a RegistrationRequest) -> Self {
        Self {
            client_id,
            username: request.username.as_str(),
            password: request.password.as_str(),
            user_attributes: request
                .attributes
                .iter()
                .map(|attribute| AttributeDto {
                    name: attribute.name.as_str(),
                    value: attribute.value.as_str(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct InitiateAuthBody<'a> {
    auth_flow: &'static str,
    client_id: &'a str,
    auth_parameters: BTreeMap<&'static str, &'a str>,
}

impl<'a> InitiateAuthBody<'a> {
    pub(super) fn new(client_id: &'a str, request: &'a PasswordAuthRequest) -> Self {
        Self {
            auth_flow: USER_PASSWORD_AUTH,
            client_id,
            auth_parameters: BTreeMap::from([
                ("USERNAME", request.username.as_str()),
                ("PASSWORD", request.password.as_str()),
            ]),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct DeleteUserBody<'a> {
    pub(super) access_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct SignUpResponseDto {
    #[serde(default)]
    user_confirmed: bool,
    user_sub: Option<String>,
}

impl SignUpResponseDto {
    pub(super) fn into_outcome(self, status: u16) -> RegistrationOutcome {
        RegistrationOutcome {
            status,
            user_confirmed: self.user_confirmed,
            user_sub: self.user_sub,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(super) struct InitiateAuthResponseDto {
    authentication_result: Option<AuthenticationResultDto>,
    challenge_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResultDto {
    id_token: Option<String>,
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

impl InitiateAuthResponseDto {
    pub(super) fn into_tokens(self) -> Result<AuthTokens, IdentityProviderError> {
        let Some(result) = self.authentication_result else {
            return Err(match self.challenge_name {
                Some(challenge) => IdentityProviderError::challenge_required(challenge),
                None => IdentityProviderError::decode("response carried no authentication result"),
            });
        };
        let id_token = result
            .id_token
            .ok_or_else(|| IdentityProviderError::decode("authentication result missing IdToken"))?;
        let access_token = result.access_token.ok_or_else(|| {
            IdentityProviderError::decode("authentication result missing AccessToken")
        })?;
        Ok(AuthTokens {
            id_token,
            access_token,
            refresh_token: result.refresh_token,
            expires_in: result.expires_in,
        })
    }
}

/// `{ "__type": "...#UsernameExistsException", "message": "..." }`
#[derive(Debug, Deserialize)]
pub(super) struct ErrorDto {
    #[serde(rename = "__type")]
    error_type: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

impl ErrorDto {
    /// Exception name with any namespace prefix removed.
    pub(super) fn code(&self) -> Option<&str> {
        self.error_type
            .as_deref()
            .map(|raw| raw.rsplit('#').next().unwrap_or(raw))
            .filter(|code| !code.is_empty())
    }

    pub(super) fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|message| !message.is_empty())
    }
}
