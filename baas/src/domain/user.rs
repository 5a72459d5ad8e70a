//! Account identity held in memory by the Accounts capability.

use serde::Serialize;

/// A signed-up or signed-in account.
///
/// Only ever lives in memory for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    email: String,
    #[serde(skip_serializing)]
    token_id: Option<String>,
}

impl User {
    /// User known only by email, e.g. straight after sign-up.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token_id: None,
        }
    }

    /// Attach the identity token obtained from sign-in.
    #[must_use]
    pub fn with_token_id(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = Some(token_id.into());
        self
    }

    /// Email used as the provider username.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Identity token from the last successful sign-in, if any.
    #[must_use]
    pub fn token_id(&self) -> Option<&str> {
        self.token_id.as_deref()
    }

    /// Whether a token is known for this user.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token_id.is_some()
    }
}
