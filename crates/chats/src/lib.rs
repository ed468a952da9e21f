//! # Messenger Chats Crate
//!
//! This crate provides the core of an in-memory messenger: users, group
//! chats and messages, the invariants that keep membership consistent, and
//! the queries over them (keyword search inside a chat, chats shared by a
//! group of users).
//!
//! ## Architecture
//!
//! - **Entities**: Domain models (User, Message, Chat)
//! - **Services**: The `Messenger` directory owning the registries
//! - **Types**: Errors, integrity findings and the peer lookup interface
//! - **Utils**: Keyword matching
//!
//! ## Usage
//!
//! ```rust
//! use messenger_chats::{Chat, Messenger, User};
//!
//! let anna = User::new("anna2001", "1122334455", "anna@yandex.ru", "Anna", "Peterson");
//! let books = Chat::new("gid3", "we read books");
//! let mut messenger = Messenger::new([anna], [books]);
//!
//! messenger.add_user_to_chat("gid3", "anna2001")?;
//! messenger.post_text("gid3", "anna2001", "Anyone read Dune?")?;
//!
//! let hits = messenger.search_chat("gid3", &["dune"])?;
//! assert_eq!(hits.len(), 1);
//! assert_eq!(messenger.describe(hits[0]).to_string(), "Anna Peterson -> all: Anyone read Dune?");
//! # Ok::<(), messenger_chats::ChatError>(())
//! ```

pub mod entities;
pub mod services;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use entities::{Chat, Message, MessageDisplay, MessageType, Payload, User, BROADCAST_LABEL};
pub use services::Messenger;
pub use types::{ChatError, ChatResult, IntegrityViolation, PeerDirectory};
pub use utils::KeywordQuery;
