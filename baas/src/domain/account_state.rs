//! Lifecycle states of the account bootstrap flow.

use std::fmt;

use serde::Serialize;

/// Account lifecycle state owned by [`crate::domain::AccountBootstrap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum AccountState {
    /// Nothing has happened yet.
    #[default]
    Null,
    /// Registration request in flight.
    SigningUp,
    /// Registration succeeded.
    SignedUp,
    /// Authentication request in flight.
    SigningIn,
    /// Authentication succeeded and a token is known.
    SignedIn,
    /// Sign-out in progress.
    SigningOut,
    /// Signed out; no user is held.
    SignedOut,
}

impl AccountState {
    /// Stable display name for the state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::SigningUp => "SigningUp",
            Self::SignedUp => "SignedUp",
            Self::SigningIn => "SigningIn",
            Self::SignedIn => "SignedIn",
            Self::SigningOut => "SigningOut",
            Self::SignedOut => "SignedOut",
        }
    }

    /// Status line shown by the presentation layer, tagged with the backend
    /// label.
    ///
    /// # Examples
    /// ```
    /// use baas::domain::AccountState;
    ///
    /// assert_eq!(AccountState::SigningUp.status_text("AWS"), "SigningUp :AWS");
    /// assert_eq!(
    ///     AccountState::SignedIn.status_text("AWS"),
    ///     "SignedIn (Token Is Known) :AWS"
    /// );
    /// ```
    #[must_use]
    pub fn status_text(&self, label: &str) -> String {
        let extra = if matches!(self, Self::SignedIn) {
            " (Token Is Known)"
        } else {
            ""
        };
        format!("{}{extra} :{label}", self.as_str())
    }
}

impl fmt::Display for AccountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
