//! Business logic services for the chat system.
//!
//! The directory owns the registries and coordinates operations that touch
//! more than one entity.

pub mod messenger;

// Re-export all services
pub use messenger::Messenger;
