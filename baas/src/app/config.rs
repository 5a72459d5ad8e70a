//! Runtime settings loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::AccountCredentials;
use crate::domain::auth::{TEST_ACCOUNT_EMAIL, TEST_ACCOUNT_NICKNAME, TEST_ACCOUNT_PASSWORD};

const DEFAULT_PROVIDER: &str = "cognito";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Settings for the `baas` binary: provider selection, endpoints and the
/// credentials used by the bootstrap flow.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BAAS")]
pub struct BaasSettings {
    /// Identity provider backing the accounts capability.
    pub provider: Option<String>,
    /// Cognito region used to derive the endpoint.
    pub region: Option<String>,
    /// Cognito app client id.
    pub client_id: Option<String>,
    /// Firebase web API key.
    pub api_key: Option<String>,
    /// Endpoint override for emulators and tests.
    pub endpoint: Option<String>,
    /// Timeout applied to every provider call, in seconds.
    pub timeout_seconds: Option<u64>,
    /// Value sent as the app-version attribute on sign-up.
    pub app_version: Option<String>,
    /// Bootstrap account email.
    pub email: Option<String>,
    /// Bootstrap account password.
    pub password: Option<String>,
    /// Bootstrap account nickname.
    pub nickname: Option<String>,
    /// Sign the user out once the bootstrap flow finishes.
    #[ortho_config(default = false)]
    pub sign_out: bool,
}

impl BaasSettings {
    /// Return the configured provider name, falling back to Cognito.
    pub fn provider(&self) -> &str {
        self.provider.as_deref().unwrap_or(DEFAULT_PROVIDER)
    }

    /// Return the configured Cognito region.
    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    /// Return the per-call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    /// Return the app-version tag, defaulting to the crate version.
    pub fn app_version(&self) -> &str {
        self.app_version
            .as_deref()
            .unwrap_or(env!("CARGO_PKG_VERSION"))
    }

    /// Credentials for the bootstrap flow; unset values fall back to the
    /// test account.
    pub fn credentials(&self) -> AccountCredentials {
        AccountCredentials::new(
            self.email.as_deref().unwrap_or(TEST_ACCOUNT_EMAIL),
            self.password.as_deref().unwrap_or(TEST_ACCOUNT_PASSWORD),
            self.nickname.as_deref().unwrap_or(TEST_ACCOUNT_NICKNAME),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 11] = [
        "BAAS_PROVIDER",
        "BAAS_REGION",
        "BAAS_CLIENT_ID",
        "BAAS_API_KEY",
        "BAAS_ENDPOINT",
        "BAAS_TIMEOUT_SECONDS",
        "BAAS_APP_VERSION",
        "BAAS_EMAIL",
        "BAAS_PASSWORD",
        "BAAS_NICKNAME",
        "BAAS_SIGN_OUT",
    ];

    fn load_from_empty_args() -> BaasSettings {
        BaasSettings::load_from_iter([OsString::from("baas")]).expect("config should load")
    }

    fn cleared_except(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        KEYS.iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| (*value).to_owned());
                (*key, value)
            })
            .collect()
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(cleared_except(&[]));

        let settings = load_from_empty_args();
        assert_eq!(settings.provider(), DEFAULT_PROVIDER);
        assert_eq!(settings.region(), DEFAULT_REGION);
        assert_eq!(settings.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));
        assert_eq!(settings.app_version(), env!("CARGO_PKG_VERSION"));
        assert!(!settings.sign_out);
        assert!(settings.client_id.is_none() && settings.api_key.is_none());

        let credentials = settings.credentials();
        assert_eq!(credentials.email(), TEST_ACCOUNT_EMAIL);
        assert_eq!(credentials.password(), TEST_ACCOUNT_PASSWORD);
        assert_eq!(credentials.nickname(), TEST_ACCOUNT_NICKNAME);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_except(&[
            ("BAAS_PROVIDER", "firebase"),
            ("BAAS_API_KEY", "key-1"),
            ("BAAS_TIMEOUT_SECONDS", "3"),
            ("BAAS_APP_VERSION", "9.9.9"),
            ("BAAS_EMAIL", "ada@example.com"),
            ("BAAS_SIGN_OUT", "true"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(settings.provider(), "firebase");
        assert_eq!(settings.api_key.as_deref(), Some("key-1"));
        assert_eq!(settings.timeout(), Duration::from_secs(3));
        assert_eq!(settings.app_version(), "9.9.9");
        assert!(settings.sign_out);
        let credentials = settings.credentials();
        assert_eq!(credentials.email(), "ada@example.com");
        assert_eq!(credentials.nickname(), TEST_ACCOUNT_NICKNAME);
    }

    #[rstest]
    fn command_line_flags_override_environment() {
        let _guard = lock_env(cleared_except(&[
            ("BAAS_PROVIDER", "cognito"),
            ("BAAS_REGION", "eu-west-2"),
        ]));

        let settings = BaasSettings::load_from_iter(
            ["baas", "--provider", "firebase", "--api-key", "cli-key"].map(OsString::from),
        )
        .expect("config should load");
        assert_eq!(settings.provider(), "firebase");
        assert_eq!(settings.api_key.as_deref(), Some("cli-key"));
        assert_eq!(settings.region(), "eu-west-2");
    }
}
