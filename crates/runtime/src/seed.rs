//! Initial populations: TOML seed files and the built-in demo data.

use std::path::Path;

use anyhow::{bail, Context, Result};
use messenger_chats::{Chat, Message, MessageType, Messenger, Payload, User};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<UserSeed>,
    #[serde(default)]
    pub chats: Vec<ChatSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserSeed {
    pub nickname: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub chats: Vec<String>,
    #[serde(default)]
    pub friends: Vec<String>,
    /// Private history; each message is filed under its peer
    #[serde(default)]
    pub direct_messages: Vec<MessageSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatSeed {
    pub gid: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub messages: Vec<MessageSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageSeed {
    pub sender: String,
    pub receiver: String,
    #[serde(default = "MessageSeed::default_kind")]
    pub kind: MessageType,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub bytes: Option<Vec<u8>>,
}

impl MessageSeed {
    fn default_kind() -> MessageType {
        MessageType::Text
    }

    pub fn into_message(self) -> Result<Message> {
        let payload = match (self.kind, self.text, self.bytes) {
            (MessageType::Text, Some(text), _) => Payload::Text(text),
            (MessageType::Text, None, None) => {
                bail!("text message from {} has no text", self.sender)
            }
            (kind, _, bytes) => Payload::from_bytes(kind, bytes.unwrap_or_default()),
        };
        Ok(Message::new(self.sender, self.receiver, payload))
    }
}

impl UserSeed {
    pub fn into_user(self) -> Result<User> {
        let mut user = User::new(
            self.nickname,
            self.phone,
            self.email,
            self.first_name,
            self.last_name,
        )
        .with_chats(self.chats)
        .with_friends(self.friends);

        for seed in self.direct_messages {
            let message = seed
                .into_message()
                .with_context(|| format!("invalid direct message for {}", user.nickname()))?;
            user.receive_direct_message(message);
        }
        Ok(user)
    }
}

impl ChatSeed {
    pub fn into_chat(self) -> Result<Chat> {
        let gid = self.gid;
        let messages = self
            .messages
            .into_iter()
            .map(MessageSeed::into_message)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("invalid message in chat {gid}"))?;

        Ok(Chat::new(gid, self.name)
            .with_members(self.members)
            .with_messages(messages))
    }
}

impl SeedData {
    /// Read a seed file; the format follows the file extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let seed = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .with_context(|| format!("unable to read seed file {}", path.display()))?
            .try_deserialize::<SeedData>()
            .with_context(|| format!("invalid seed file {}", path.display()))?;

        debug!(
            path = %path.display(),
            users = seed.users.len(),
            chats = seed.chats.len(),
            "seed file parsed"
        );
        Ok(seed)
    }

    pub fn into_messenger(self) -> Result<Messenger> {
        let users = self
            .users
            .into_iter()
            .map(UserSeed::into_user)
            .collect::<Result<Vec<_>>>()?;
        let chats = self
            .chats
            .into_iter()
            .map(ChatSeed::into_chat)
            .collect::<Result<Vec<_>>>()?;

        Ok(Messenger::new(users, chats))
    }
}

/// Three users and three chats: students, python learners, and an empty book club.
pub fn demo_population() -> Messenger {
    let student_chat = Chat::new("gid1", "student chat")
        .with_members(["john1999", "james66", "anna2001"])
        .with_messages(vec![
            Message::text("anna2001", "gid1", "Hello everybody!"),
            Message::text("james66", "gid1", "Hi Anna!"),
            Message::text("john1999", "anna2001", "Hello!"),
        ]);
    let python_learners = Chat::new("gid2", "we learn python").with_members(["james66", "anna2001"]);
    let book_readers = Chat::new("gid3", "we read books");

    let john = User::new("john1999", "123456789", "john@gmail.com", "John", "Johnson")
        .with_chats(["gid1"]);
    let james = User::new("james66", "987654321", "james@mipt.ru", "James", "Jameson")
        .with_chats(["gid1", "gid2"])
        .with_friends(["anna2001"]);
    let mut anna = User::new("anna2001", "1122334455", "anna@yandex.ru", "Anna", "Peterson")
        .with_chats(["gid1", "gid2"])
        .with_friends(["james66"]);
    anna.receive_direct_message(Message::text(
        "anna2001",
        "james66",
        "Hi James, do you know python?",
    ));

    info!("using built-in demo population");
    Messenger::new(
        [john, james, anna],
        [student_chat, python_learners, book_readers],
    )
}
