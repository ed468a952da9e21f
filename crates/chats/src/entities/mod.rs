//! Domain entities for the chat system.
//!
//! Users, messages and group chats. These are plain data records; they hold
//! no reference to the directory that registers them.

pub mod chat;
pub mod message;
pub mod user;

// Re-export all entity types
pub use chat::Chat;
pub use message::{Message, MessageDisplay, MessageType, Payload, BROADCAST_LABEL};
pub use user::User;
