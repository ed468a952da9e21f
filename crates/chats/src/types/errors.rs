//! Error types for the chat system.

use thiserror::Error;

use super::IntegrityViolation;

/// Result type alias for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Main error type for the chat system
#[derive(Debug, Error, PartialEq)]
pub enum ChatError {
    #[error("User not found: {nickname}")]
    UserNotFound { nickname: String },

    #[error("Chat not found: {gid}")]
    ChatNotFound { gid: String },

    #[error("User already registered: {nickname}")]
    DuplicateUser { nickname: String },

    #[error("Chat already registered: {gid}")]
    DuplicateChat { gid: String },

    #[error("Invalid argument: shared chats need at least one user")]
    EmptyUserList,

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Directory integrity check failed with {} violation(s)", .violations.len())]
    Integrity { violations: Vec<IntegrityViolation> },
}

impl ChatError {
    /// Create a not found error for users
    pub fn user_not_found(nickname: impl Into<String>) -> Self {
        Self::UserNotFound {
            nickname: nickname.into(),
        }
    }

    /// Create a not found error for chats
    pub fn chat_not_found(gid: impl Into<String>) -> Self {
        Self::ChatNotFound { gid: gid.into() }
    }

    pub fn duplicate_user(nickname: impl Into<String>) -> Self {
        Self::DuplicateUser {
            nickname: nickname.into(),
        }
    }

    pub fn duplicate_chat(gid: impl Into<String>) -> Self {
        Self::DuplicateChat { gid: gid.into() }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
