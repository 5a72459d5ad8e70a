//! Inbound adapters: the presentation collaborator driving the bootstrap.

pub mod console;
