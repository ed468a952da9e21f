//! Shared types and interfaces for the chat system.
//!
//! This module contains common types, error definitions, and the lookup
//! interface entities use to resolve peer identifiers for display.

pub mod errors;
pub mod integrity;

// Re-export common types
pub use errors::{ChatError, ChatResult};
pub use integrity::IntegrityViolation;

/// Narrow lookup capability over the directory's registries.
///
/// Display code takes an `Option<&dyn PeerDirectory>` instead of holding a
/// reference to the directory, so entities stay plain data.
pub trait PeerDirectory {
    /// Whether `id` is the gid of a registered chat
    fn is_chat(&self, id: &str) -> bool;

    /// Display name of the registered user with this nickname
    fn display_name(&self, nickname: &str) -> Option<String>;
}
