//! Console presentation collaborator.
//!
//! Renders status lines and user details through `tracing`. Tokens are
//! shortened here for display; the domain always carries them whole.

use std::sync::Mutex;

use tracing::info;

use crate::domain::User;
use crate::domain::ports::StatusSink;

const TOKEN_PREVIEW_CHARS: usize = 12;

/// [`StatusSink`] that logs each status line and remembers the latest one.
#[derive(Debug, Default)]
pub struct ConsoleStatusSink {
    current: Mutex<String>,
}

impl ConsoleStatusSink {
    /// Sink with an empty status line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently displayed status line.
    #[must_use]
    pub fn current(&self) -> String {
        self.current
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Display the user read back after the bootstrap flow.
    pub fn show_user(&self, user: Option<&User>) {
        match user {
            Some(user) => info!(
                email = %user.email(),
                token = %user.token_id().map(token_preview).unwrap_or_default(),
                "current user"
            ),
            None => info!("no current user"),
        }
    }
}

impl StatusSink for ConsoleStatusSink {
    fn set_status(&self, text: &str) {
        text.clone_into(
            &mut self
                .current
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner),
        );
        info!(status = text, "status");
    }
}

/// First characters of `token` followed by an ellipsis when it was cut.
#[must_use]
pub fn token_preview(token: &str) -> String {
    let mut chars = token.chars();
    let head: String = chars.by_ref().take(TOKEN_PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "")]
    #[case("short", "short")]
    #[case("exactly12chr", "exactly12chr")]
    #[case("eyJraWQiOiJhYmMiLCJhbGciOiJSUzI1NiJ9", "eyJraWQiOiJh...")]
    fn previews_tokens(#[case] token: &str, #[case] expected: &str) {
        assert_eq!(token_preview(token), expected);
    }

    #[test]
    fn sink_remembers_latest_status() {
        let sink = ConsoleStatusSink::new();
        sink.set_status("SigningUp :AWS");
        sink.set_status("SignedUp :AWS");
        assert_eq!(sink.current(), "SignedUp :AWS");
    }
}
