//! Driving-side port for the presentation collaborator.
//!
//! The bootstrap flow pushes one status line per account state transition.
//! The collaborator owns rendering; it returns nothing.

/// Pure sink for status text.
pub trait StatusSink: Send + Sync {
    /// Replace the displayed status line.
    fn set_status(&self, text: &str);
}

/// Sink that discards every status line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStatusSink;

impl StatusSink for NullStatusSink {
    fn set_status(&self, _text: &str) {}
}
