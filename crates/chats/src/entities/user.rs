use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::message::Message;

/// Represents a user of the messenger, keyed by nickname.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Unique, stable primary key
    nickname: String,
    phone: String,
    email: String,
    first_name: String,
    last_name: String,
    /// Private conversations keyed by peer nickname
    #[serde(default)]
    direct_messages: BTreeMap<String, Vec<Message>>,
    /// Gids of the chats this user belongs to
    #[serde(default)]
    chats: BTreeSet<String>,
    /// Peer nicknames
    #[serde(default)]
    friends: BTreeSet<String>,
}

impl User {
    /// Create a new user with empty relationships
    pub fn new(
        nickname: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            nickname: nickname.into(),
            phone: phone.into(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            direct_messages: BTreeMap::new(),
            chats: BTreeSet::new(),
            friends: BTreeSet::new(),
        }
    }

    /// Seed the chat set. The matching chats must list this user as a member.
    pub fn with_chats<I, S>(mut self, chats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chats = chats.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_friends<I, S>(mut self, friends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.friends = friends.into_iter().map(Into::into).collect();
        self
    }

    /// Seed the direct message history, keyed by peer nickname
    pub fn with_direct_messages(mut self, direct_messages: BTreeMap<String, Vec<Message>>) -> Self {
        self.direct_messages = direct_messages;
        self
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// `"<first name> <last name>"`
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn chats(&self) -> &BTreeSet<String> {
        &self.chats
    }

    pub fn is_in_chat(&self, gid: &str) -> bool {
        self.chats.contains(gid)
    }

    /// Record membership of `gid`. Only `Chat::add_user` calls this, so the
    /// member set on the chat side is updated in the same step.
    pub(crate) fn join_chat(&mut self, gid: &str) -> bool {
        self.chats.insert(gid.to_string())
    }

    pub fn friends(&self) -> &BTreeSet<String> {
        &self.friends
    }

    pub fn is_friend(&self, nickname: &str) -> bool {
        self.friends.contains(nickname)
    }

    /// Add a friend; returns `false` if already present
    pub fn add_friend(&mut self, nickname: impl Into<String>) -> bool {
        self.friends.insert(nickname.into())
    }

    pub fn direct_messages(&self) -> &BTreeMap<String, Vec<Message>> {
        &self.direct_messages
    }

    /// Ordered private conversation with `peer`
    pub fn direct_messages_with(&self, peer: &str) -> &[Message] {
        self.direct_messages
            .get(peer)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Append a private message to the conversation with its peer.
    ///
    /// The peer is the sender when this user is the receiver, the receiver otherwise.
    pub fn receive_direct_message(&mut self, message: Message) {
        let peer = if message.receiver() == self.nickname {
            message.sender().to_string()
        } else {
            message.receiver().to_string()
        };

        debug!(nickname = %self.nickname, %peer, "direct message stored");
        self.direct_messages.entry(peer).or_default().push(message);
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}
