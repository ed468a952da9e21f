use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::message::Message;
use super::user::User;
use crate::utils::KeywordQuery;

/// Represents a group conversation.
///
/// Membership and the message log are only reachable through the methods
/// below, so the member set and each user's chat set move together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chat {
    /// Group id, the primary key
    gid: String,
    /// Display name
    name: String,
    /// Member nicknames
    #[serde(default)]
    members: BTreeSet<String>,
    /// Append-only, in chronological order
    #[serde(default)]
    messages: Vec<Message>,
}

impl Chat {
    /// Create a new chat with no members and no messages
    pub fn new(gid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            gid: gid.into(),
            name: name.into(),
            members: BTreeSet::new(),
            messages: Vec::new(),
        }
    }

    /// Seed the member set. The matching users must list this chat.
    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }

    /// Seed the message log, oldest first
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn gid(&self) -> &str {
        &self.gid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &BTreeSet<String> {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_member(&self, nickname: &str) -> bool {
        self.members.contains(nickname)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Add `user` to the members and this chat to the user's chats.
    ///
    /// Re-adding an existing member changes nothing.
    pub fn add_user(&mut self, user: &mut User) {
        let joined = self.members.insert(user.nickname().to_string());
        user.join_chat(&self.gid);

        debug!(gid = %self.gid, nickname = user.nickname(), joined, "chat.add_user");
    }

    /// Append a message to the log. The receiver is not checked against the gid.
    pub fn add_message(&mut self, message: Message) {
        debug!(
            gid = %self.gid,
            sender = message.sender(),
            message_type = message.message_type().as_str(),
            "chat.add_message"
        );
        self.messages.push(message);
    }

    /// Post `text` from `user` to this chat
    pub fn add_text_message(&mut self, user: &User, text: impl Into<String>) {
        let message = Message::text(user.nickname(), self.gid.clone(), text);
        self.add_message(message);
    }

    /// Text messages containing every word (case-insensitive substring), oldest first.
    ///
    /// Media messages never match. An empty `words` returns every text message.
    pub fn find_messages_with_words<S: AsRef<str>>(&self, words: &[S]) -> Vec<&Message> {
        let query = KeywordQuery::new(words);

        let found: Vec<&Message> = self
            .messages
            .iter()
            .filter(|message| message.text_content().is_some_and(|text| query.matches(text)))
            .collect();

        debug!(gid = %self.gid, words = ?query.words(), hits = found.len(), "chat search");
        found
    }
}

impl fmt::Display for Chat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} user(s)", self.name, self.members.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::message::Payload;

    fn james() -> User {
        User::new("james66", "987654321", "james@mipt.ru", "James", "Jameson")
    }

    fn john() -> User {
        User::new("john1999", "123456789", "john@gmail.com", "John", "Johnson")
    }

    #[test]
    fn test_chat_creation() {
        let chat = Chat::new("gid1", "student chat").with_members(["john1999", "james66"]);

        assert_eq!(chat.gid(), "gid1");
        assert_eq!(chat.name(), "student chat");
        assert_eq!(chat.member_count(), 2);
        assert!(chat.is_member("james66"));
        assert!(chat.messages().is_empty());
        assert_eq!(chat.to_string(), "student chat: 2 user(s)");
    }

    #[test]
    fn test_add_user_updates_both_sides() {
        let mut chat = Chat::new("gid3", "we read books");
        let mut user = james();

        chat.add_user(&mut user);

        assert!(chat.is_member("james66"));
        assert!(user.is_in_chat("gid3"));
        assert_eq!(chat.to_string(), "we read books: 1 user(s)");
    }

    #[test]
    fn test_add_user_is_idempotent() {
        let mut chat = Chat::new("gid3", "we read books");
        let mut user = james();

        chat.add_user(&mut user);
        chat.add_user(&mut user);

        assert_eq!(chat.member_count(), 1);
        assert_eq!(user.chats().len(), 1);
    }

    #[test]
    fn test_add_text_message_appends_last() {
        let mut chat = Chat::new("gid2", "we learn python");
        let user = john();

        chat.add_text_message(&user, "Hello everyone!");
        chat.add_text_message(&user, "How are you?");

        let last = chat.messages().last().unwrap();
        assert_eq!(last.sender(), "john1999");
        assert_eq!(last.receiver(), "gid2");
        assert_eq!(last.text_content(), Some("How are you?"));
        assert_eq!(chat.messages().len(), 2);
    }

    #[test]
    fn test_duplicate_content_is_kept() {
        let mut chat = Chat::new("gid2", "we learn python");
        let user = john();

        chat.add_text_message(&user, "ping");
        chat.add_text_message(&user, "ping");

        assert_eq!(chat.messages().len(), 2);
    }

    #[test]
    fn test_find_messages_with_words() {
        let mut chat = Chat::new("gid2", "we learn python");
        let user = james();
        chat.add_text_message(&user, "Hello everyone!");
        chat.add_text_message(&user, "Ready to learn python!");
        chat.add_text_message(&user, "Me too!");
        chat.add_text_message(&user, "Hey python, ready or not, I'm here!");

        let found = chat.find_messages_with_words(&["python", "ready"]);
        let texts: Vec<_> = found.iter().filter_map(|m| m.text_content()).collect();
        assert_eq!(
            texts,
            vec!["Ready to learn python!", "Hey python, ready or not, I'm here!"]
        );
    }

    #[test]
    fn test_find_skips_media_messages() {
        let mut chat = Chat::new("gid1", "student chat");
        chat.add_message(Message::new("anna2001", "gid1", Payload::Image(b"python".to_vec())));
        chat.add_message(Message::text("anna2001", "gid1", "python"));

        let found = chat.find_messages_with_words(&["python"]);
        assert_eq!(found.len(), 1);
        assert!(found[0].is_text());
    }

    #[test]
    fn test_empty_query_returns_text_in_log_order() {
        let mut chat = Chat::new("gid1", "student chat");
        chat.add_message(Message::text("anna2001", "gid1", "first"));
        chat.add_message(Message::new("james66", "gid1", Payload::Image(vec![1, 2])));
        chat.add_message(Message::text("james66", "gid1", "second"));
        chat.add_message(Message::new("anna2001", "gid1", Payload::Sticker(vec![3])));
        chat.add_message(Message::text("john1999", "gid1", "third"));

        let everything = chat.find_messages_with_words::<&str>(&[]);
        let expected: Vec<&Message> = chat.messages().iter().filter(|m| m.is_text()).collect();

        assert_eq!(everything.len(), expected.len());
        for (found, wanted) in everything.iter().zip(&expected) {
            assert!(std::ptr::eq(*found, *wanted));
        }
        let texts: Vec<_> = everything.iter().filter_map(|m| m.text_content()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_find_no_match() {
        let mut chat = Chat::new("gid1", "student chat");
        chat.add_message(Message::text("anna2001", "gid1", "Hello everybody!"));

        assert!(chat.find_messages_with_words(&["zzz-no-match"]).is_empty());
    }
}
