//! Account credentials and their local validation.
//!
//! Validation happens before any network call so identity adapters only
//! ever see well-formed requests.

use std::fmt;

use zeroize::Zeroizing;

/// Email used by the built-in test account.
pub const TEST_ACCOUNT_EMAIL: &str = "test.email@test.email.com";
/// Password used by the built-in test account.
pub const TEST_ACCOUNT_PASSWORD: &str = "test.password!AND@#%123";
/// Nickname used by the built-in test account.
pub const TEST_ACCOUNT_NICKNAME: &str = "test.nickname";

/// Domain error returned when credential values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was empty.
    EmptyPassword,
    /// Nickname was missing or blank once trimmed.
    EmptyNickname,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmptyNickname => write!(f, "nickname must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated email/password pair used for sign-in.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty but keeps caller-provided whitespace.
#[derive(Clone, PartialEq, Eq)]
pub struct SignInCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl SignInCredentials {
    /// Validate raw email/password inputs.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsValidationError`] when either value is empty.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email, used as the provider username.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password supplied by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Full credential set used to sign an account up and in.
///
/// Values are not validated on construction; the identity client validates
/// them per operation and reports failures through a
/// [`crate::domain::Response`].
///
/// # Examples
/// ```
/// use baas::domain::AccountCredentials;
///
/// let creds = AccountCredentials::new("ada@example.com", "hunter22", "ada");
/// assert_eq!(creds.email(), "ada@example.com");
/// assert_eq!(creds.nickname(), "ada");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccountCredentials {
    email: String,
    password: Zeroizing<String>,
    nickname: String,
}

impl AccountCredentials {
    /// Build a credential set from caller-supplied values.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        nickname: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: Zeroizing::new(password.into()),
            nickname: nickname.into(),
        }
    }

    /// Hardcoded test account used when no credentials are configured.
    #[must_use]
    pub fn test_account() -> Self {
        Self::new(
            TEST_ACCOUNT_EMAIL,
            TEST_ACCOUNT_PASSWORD,
            TEST_ACCOUNT_NICKNAME,
        )
    }

    /// Account email.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Account password.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Account nickname.
    #[must_use]
    pub fn nickname(&self) -> &str {
        self.nickname.as_str()
    }
}

impl fmt::Debug for SignInCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("nickname", &self.nickname)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("   ", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("ada@example.com", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_sign_in_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = SignInCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  ada@example.com  ", "secret")]
    #[case("bob@example.com", " padded password ")]
    fn valid_sign_in_credentials_trim_email(#[case] email: &str, #[case] password: &str) {
        let creds = SignInCredentials::try_from_parts(email, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.email(), email.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    fn sign_in_debug_output_redacts_password() {
        let creds = SignInCredentials::try_from_parts("ada@example.com", "hunter22-secret")
            .expect("valid inputs should succeed");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("ada@example.com"));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("hunter22-secret"));
    }

    #[rstest]
    fn debug_output_redacts_password() {
        let rendered = format!("{:?}", AccountCredentials::test_account());
        assert!(rendered.contains(TEST_ACCOUNT_EMAIL));
        assert!(!rendered.contains(TEST_ACCOUNT_PASSWORD));
    }
}
