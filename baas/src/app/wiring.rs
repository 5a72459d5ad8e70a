//! Backend selection and composition.
//!
//! The provider is chosen once from settings; both providers yield the same
//! facade type so callers never branch on which one is in use.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;
use tracing::info;

use super::BaasSettings;
use crate::domain::ports::IdentityProvider;
use crate::domain::{BackendSystem, IdentityAccounts, IdentityProviderClient};
use crate::outbound::cognito::{CognitoHttpProvider, cognito_endpoint};
use crate::outbound::firebase::{FIREBASE_DEFAULT_BASE, FirebaseHttpProvider};
use crate::outbound::placeholder::{PlaceholderCloudCode, PlaceholderDatabase};

/// Facade type produced by [`build_backend_system`].
pub type BaasSystem = BackendSystem<IdentityAccounts, PlaceholderCloudCode, PlaceholderDatabase>;

/// Configuration problems detected while wiring the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// The provider name is not recognised.
    #[error("unknown provider `{name}`; expected `cognito` or `firebase`")]
    UnknownProvider { name: String },
    /// Cognito was selected without an app client id.
    #[error("cognito requires BAAS_CLIENT_ID")]
    MissingClientId,
    /// Firebase was selected without an API key.
    #[error("firebase requires BAAS_API_KEY")]
    MissingApiKey,
    /// The endpoint could not be parsed as a URL.
    #[error("invalid endpoint `{endpoint}`: {message}")]
    InvalidEndpoint { endpoint: String, message: String },
    /// The HTTP client could not be built.
    #[error("failed to build http client: {message}")]
    HttpClient { message: String },
}

/// The backend providers this binary can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendProvider {
    /// AWS Cognito user pools.
    Cognito,
    /// Firebase identity toolkit.
    Firebase,
}

impl BackendProvider {
    /// Facade name, shown as the status-text label.
    #[must_use]
    pub const fn system_name(self) -> &'static str {
        match self {
            Self::Cognito => "AWS",
            Self::Firebase => "Firebase",
        }
    }
}

impl fmt::Display for BackendProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cognito => "cognito",
            Self::Firebase => "firebase",
        })
    }
}

impl FromStr for BackendProvider {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cognito" | "aws" => Ok(Self::Cognito),
            "firebase" => Ok(Self::Firebase),
            _ => Err(SettingsError::UnknownProvider { name: s.to_owned() }),
        }
    }
}

/// Build the backend system selected by `settings`.
///
/// No network I/O happens here; adapters only connect when the bootstrap
/// flow calls them.
///
/// # Errors
///
/// Returns [`SettingsError`] when the provider is unknown, a required
/// credential is missing, or the endpoint override is not a URL.
pub fn build_backend_system(settings: &BaasSettings) -> Result<BaasSystem, SettingsError> {
    let provider = settings.provider().parse::<BackendProvider>()?;
    let identity = identity_provider(provider, settings)?;
    info!(%provider, system = provider.system_name(), "backend provider selected");
    Ok(assemble(
        provider.system_name(),
        identity,
        settings.app_version(),
        settings.timeout(),
    ))
}

/// Compose a facade around an arbitrary identity provider.
pub fn assemble(
    name: &str,
    identity: Arc<dyn IdentityProvider>,
    app_version: &str,
    timeout: Duration,
) -> BaasSystem {
    let client = IdentityProviderClient::new(identity, app_version).with_call_timeout(timeout);
    BackendSystem::new(
        name,
        IdentityAccounts::new(client),
        PlaceholderCloudCode::default(),
        PlaceholderDatabase::default(),
    )
}

fn identity_provider(
    provider: BackendProvider,
    settings: &BaasSettings,
) -> Result<Arc<dyn IdentityProvider>, SettingsError> {
    let timeout = settings.timeout();
    match provider {
        BackendProvider::Cognito => {
            let client_id = required(settings.client_id.as_deref(), SettingsError::MissingClientId)?;
            let endpoint = match settings.endpoint.as_deref() {
                Some(raw) => parse_endpoint(raw)?,
                None => cognito_endpoint(settings.region()).map_err(|error| {
                    SettingsError::InvalidEndpoint {
                        endpoint: settings.region().to_owned(),
                        message: error.to_string(),
                    }
                })?,
            };
            let adapter = CognitoHttpProvider::new(endpoint, client_id, timeout)
                .map_err(http_client_error)?;
            Ok(Arc::new(adapter))
        }
        BackendProvider::Firebase => {
            let api_key = required(settings.api_key.as_deref(), SettingsError::MissingApiKey)?;
            let base = parse_endpoint(settings.endpoint.as_deref().unwrap_or(FIREBASE_DEFAULT_BASE))?;
            let adapter =
                FirebaseHttpProvider::new(base, api_key, timeout).map_err(http_client_error)?;
            Ok(Arc::new(adapter))
        }
    }
}

fn required(value: Option<&str>, missing: SettingsError) -> Result<&str, SettingsError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(missing)
}

fn parse_endpoint(raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw).map_err(|error| SettingsError::InvalidEndpoint {
        endpoint: raw.to_owned(),
        message: error.to_string(),
    })
}

fn http_client_error(error: reqwest::Error) -> SettingsError {
    SettingsError::HttpClient {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn settings() -> BaasSettings {
        BaasSettings {
            provider: None,
            region: None,
            client_id: None,
            api_key: None,
            endpoint: None,
            timeout_seconds: None,
            app_version: None,
            email: None,
            password: None,
            nickname: None,
            sign_out: false,
        }
    }

    #[rstest]
    #[case("cognito", BackendProvider::Cognito)]
    #[case(" AWS ", BackendProvider::Cognito)]
    #[case("Firebase", BackendProvider::Firebase)]
    fn parses_provider_names(#[case] raw: &str, #[case] expected: BackendProvider) {
        assert_eq!(raw.parse::<BackendProvider>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_provider() {
        let err = "parse".parse::<BackendProvider>().expect_err("unknown provider");
        assert_eq!(
            err,
            SettingsError::UnknownProvider {
                name: "parse".to_owned()
            }
        );
    }

    #[rstest]
    fn cognito_requires_client_id(settings: BaasSettings) {
        let err = build_backend_system(&settings).expect_err("client id missing");
        assert_eq!(err, SettingsError::MissingClientId);
    }

    #[rstest]
    fn firebase_requires_api_key(mut settings: BaasSettings) {
        settings.provider = Some("firebase".to_owned());
        settings.api_key = Some("   ".to_owned());
        let err = build_backend_system(&settings).expect_err("api key missing");
        assert_eq!(err, SettingsError::MissingApiKey);
    }

    #[rstest]
    fn invalid_endpoint_is_reported(mut settings: BaasSettings) {
        settings.client_id = Some("client-1".to_owned());
        settings.endpoint = Some("not a url".to_owned());
        let err = build_backend_system(&settings).expect_err("endpoint invalid");
        assert!(matches!(err, SettingsError::InvalidEndpoint { ref endpoint, .. } if endpoint == "not a url"));
    }

    #[rstest]
    #[case(Some("cognito"), Some("client-1"), None, "AWS")]
    #[case(Some("firebase"), None, Some("key-1"), "Firebase")]
    fn builds_uninitialised_system_named_after_provider(
        mut settings: BaasSettings,
        #[case] provider: Option<&str>,
        #[case] client_id: Option<&str>,
        #[case] api_key: Option<&str>,
        #[case] expected_name: &str,
    ) {
        settings.provider = provider.map(str::to_owned);
        settings.client_id = client_id.map(str::to_owned);
        settings.api_key = api_key.map(str::to_owned);

        let system = build_backend_system(&settings).expect("system builds");

        assert_eq!(system.name(), expected_name);
        assert!(!system.is_initialized());
        assert!(system.require_is_initialized().is_err());
    }
}
