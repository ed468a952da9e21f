//! The directory: global user and chat registries plus cross-chat queries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::entities::{Chat, Message, MessageDisplay, User};
use crate::types::{ChatError, ChatResult, IntegrityViolation, PeerDirectory};

/// Owns every registered user and chat.
///
/// Entities never point back at the directory. Display code receives it as a
/// [`PeerDirectory`] argument instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Registries")]
pub struct Messenger {
    users: BTreeMap<String, User>,
    chats: BTreeMap<String, Chat>,
}

/// Wire shape of a [`Messenger`]. Map keys are ignored on the way in; every
/// entity is re-keyed by its own nickname or gid.
#[derive(Deserialize)]
struct Registries {
    #[serde(default)]
    users: BTreeMap<String, User>,
    #[serde(default)]
    chats: BTreeMap<String, Chat>,
}

impl From<Registries> for Messenger {
    fn from(registries: Registries) -> Self {
        Self::new(registries.users.into_values(), registries.chats.into_values())
    }
}

impl Messenger {
    /// Bulk bootstrap from a user population and a chat population.
    ///
    /// Entities are keyed by their own nickname/gid; a repeated key replaces
    /// the earlier entity.
    pub fn new<U, C>(users: U, chats: C) -> Self
    where
        U: IntoIterator<Item = User>,
        C: IntoIterator<Item = Chat>,
    {
        let mut messenger = Self::default();

        for user in users {
            if let Some(previous) = messenger.users.insert(user.nickname().to_string(), user) {
                warn!(nickname = previous.nickname(), "duplicate user replaced during bootstrap");
            }
        }

        for chat in chats {
            if let Some(previous) = messenger.chats.insert(chat.gid().to_string(), chat) {
                warn!(gid = previous.gid(), "duplicate chat replaced during bootstrap");
            }
        }

        debug!(
            users = messenger.users.len(),
            chats = messenger.chats.len(),
            "messenger bootstrapped"
        );
        messenger
    }

    pub fn user(&self, nickname: &str) -> Option<&User> {
        self.users.get(nickname)
    }

    pub fn chat(&self, gid: &str) -> Option<&Chat> {
        self.chats.get(gid)
    }

    pub fn users(&self) -> impl Iterator<Item = &User> {
        self.users.values()
    }

    pub fn chats(&self) -> impl Iterator<Item = &Chat> {
        self.chats.values()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn chat_count(&self) -> usize {
        self.chats.len()
    }

    pub fn contains_user(&self, nickname: &str) -> bool {
        self.users.contains_key(nickname)
    }

    pub fn contains_chat(&self, gid: &str) -> bool {
        self.chats.contains_key(gid)
    }

    /// Add a user after bootstrap
    pub fn register_user(&mut self, user: User) -> ChatResult<()> {
        if user.nickname().trim().is_empty() {
            return Err(ChatError::validation("nickname cannot be empty"));
        }
        if self.users.contains_key(user.nickname()) {
            return Err(ChatError::duplicate_user(user.nickname()));
        }

        debug!(nickname = user.nickname(), "user registered");
        self.users.insert(user.nickname().to_string(), user);
        Ok(())
    }

    /// Add a chat after bootstrap
    pub fn register_chat(&mut self, chat: Chat) -> ChatResult<()> {
        if chat.gid().trim().is_empty() {
            return Err(ChatError::validation("gid cannot be empty"));
        }
        if self.chats.contains_key(chat.gid()) {
            return Err(ChatError::duplicate_chat(chat.gid()));
        }

        debug!(gid = chat.gid(), "chat registered");
        self.chats.insert(chat.gid().to_string(), chat);
        Ok(())
    }

    /// Join a registered user to a registered chat via [`Chat::add_user`]
    pub fn add_user_to_chat(&mut self, gid: &str, nickname: &str) -> ChatResult<()> {
        let chat = self
            .chats
            .get_mut(gid)
            .ok_or_else(|| ChatError::chat_not_found(gid))?;
        let user = self
            .users
            .get_mut(nickname)
            .ok_or_else(|| ChatError::user_not_found(nickname))?;

        chat.add_user(user);
        Ok(())
    }

    /// Post a text message from `nickname` to chat `gid`
    pub fn post_text(&mut self, gid: &str, nickname: &str, text: impl Into<String>) -> ChatResult<()> {
        let chat = self
            .chats
            .get_mut(gid)
            .ok_or_else(|| ChatError::chat_not_found(gid))?;
        let user = self
            .users
            .get(nickname)
            .ok_or_else(|| ChatError::user_not_found(nickname))?;

        chat.add_text_message(user, text);
        Ok(())
    }

    /// Append an arbitrary message to chat `gid`
    pub fn post_message(&mut self, gid: &str, message: Message) -> ChatResult<()> {
        let chat = self
            .chats
            .get_mut(gid)
            .ok_or_else(|| ChatError::chat_not_found(gid))?;

        chat.add_message(message);
        Ok(())
    }

    /// Deliver a private text message. It is stored once, in the receiver's
    /// direct log under the sender's nickname.
    pub fn send_direct_text(&mut self, from: &str, to: &str, text: impl Into<String>) -> ChatResult<()> {
        if !self.users.contains_key(from) {
            return Err(ChatError::user_not_found(from));
        }
        let receiver = self
            .users
            .get_mut(to)
            .ok_or_else(|| ChatError::user_not_found(to))?;

        receiver.receive_direct_message(Message::text(from, to, text));
        Ok(())
    }

    /// Chats every one of `users` belongs to.
    ///
    /// Reads each user's chat set as it is now. Result order is not part of
    /// the contract. An empty `users` slice is an invalid argument.
    pub fn get_shared_chats(&self, users: &[&User]) -> ChatResult<Vec<&Chat>> {
        let (first, rest) = users.split_first().ok_or(ChatError::EmptyUserList)?;

        let shared: Vec<&Chat> = first
            .chats()
            .iter()
            .filter(|gid| rest.iter().all(|user| user.is_in_chat(gid)))
            .filter_map(|gid| {
                let chat = self.chats.get(gid.as_str());
                if chat.is_none() {
                    warn!(%gid, "shared chat id is not registered, skipping");
                }
                chat
            })
            .collect();

        debug!(users = users.len(), shared = shared.len(), "shared chats resolved");
        Ok(shared)
    }

    /// [`Messenger::get_shared_chats`] for registered nicknames
    pub fn get_shared_chats_by_nickname<S: AsRef<str>>(&self, nicknames: &[S]) -> ChatResult<Vec<&Chat>> {
        let users = nicknames
            .iter()
            .map(|nickname| {
                let nickname = nickname.as_ref();
                self.user(nickname)
                    .ok_or_else(|| ChatError::user_not_found(nickname))
            })
            .collect::<ChatResult<Vec<&User>>>()?;

        self.get_shared_chats(&users)
    }

    /// Keyword search inside chat `gid`
    pub fn search_chat<S: AsRef<str>>(&self, gid: &str, words: &[S]) -> ChatResult<Vec<&Message>> {
        let chat = self.chat(gid).ok_or_else(|| ChatError::chat_not_found(gid))?;
        Ok(chat.find_messages_with_words(words))
    }

    /// Render `message` with peer labels resolved against this directory
    pub fn describe<'a>(&'a self, message: &'a Message) -> MessageDisplay<'a> {
        message.display_with(Some(self))
    }

    /// Audit the cross-registry references and report every broken one
    pub fn verify_integrity(&self) -> Vec<IntegrityViolation> {
        let mut violations = Vec::new();

        for chat in self.chats.values() {
            for nickname in chat.members() {
                match self.users.get(nickname) {
                    None => violations.push(IntegrityViolation::UnknownMember {
                        gid: chat.gid().to_string(),
                        nickname: nickname.clone(),
                    }),
                    Some(user) if !user.is_in_chat(chat.gid()) => {
                        violations.push(IntegrityViolation::MemberMissingChat {
                            gid: chat.gid().to_string(),
                            nickname: nickname.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }

            for message in chat.messages() {
                let receiver = message.receiver();
                if !self.chats.contains_key(receiver) && !self.users.contains_key(receiver) {
                    violations.push(IntegrityViolation::UnknownReceiver {
                        gid: chat.gid().to_string(),
                        receiver: receiver.to_string(),
                    });
                }
            }
        }

        for user in self.users.values() {
            for gid in user.chats() {
                match self.chats.get(gid) {
                    None => violations.push(IntegrityViolation::UnknownChat {
                        nickname: user.nickname().to_string(),
                        gid: gid.clone(),
                    }),
                    Some(chat) if !chat.is_member(user.nickname()) => {
                        violations.push(IntegrityViolation::MembershipMismatch {
                            nickname: user.nickname().to_string(),
                            gid: gid.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        for violation in &violations {
            warn!(%violation, "integrity violation");
        }
        violations
    }

    /// Fail with [`ChatError::Integrity`] if the audit finds anything
    pub fn ensure_integrity(&self) -> ChatResult<()> {
        let violations = self.verify_integrity();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ChatError::Integrity { violations })
        }
    }
}

impl PeerDirectory for Messenger {
    fn is_chat(&self, id: &str) -> bool {
        self.chats.contains_key(id)
    }

    fn display_name(&self, nickname: &str) -> Option<String> {
        self.users.get(nickname).map(User::display_name)
    }
}
