//! Internal utilities for the chat system.

pub mod search;

pub use search::KeywordQuery;
