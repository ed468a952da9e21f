use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::PeerDirectory;

/// Label every chat-addressed identifier resolves to
pub const BROADCAST_LABEL: &str = "all";

/// Message type enumeration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Text,
    Image,
    Sticker,
    Video,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Text => "text",
            MessageType::Image => "image",
            MessageType::Sticker => "sticker",
            MessageType::Video => "video",
        }
    }
}

/// Message body, keyed by message type.
///
/// Only the text variant carries a string; media variants are opaque bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Payload {
    Text(String),
    Image(Vec<u8>),
    Sticker(Vec<u8>),
    Video(Vec<u8>),
}

impl Payload {
    /// The message type this payload belongs to
    pub fn message_type(&self) -> MessageType {
        match self {
            Payload::Text(_) => MessageType::Text,
            Payload::Image(_) => MessageType::Image,
            Payload::Sticker(_) => MessageType::Sticker,
            Payload::Video(_) => MessageType::Video,
        }
    }

    /// Text content, present only for text payloads
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Raw bytes of a media payload
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Payload::Text(_) => None,
            Payload::Image(bytes) | Payload::Sticker(bytes) | Payload::Video(bytes) => Some(bytes),
        }
    }

    /// Build a media payload of the given type. A `Text` type decodes the bytes lossily.
    pub fn from_bytes(message_type: MessageType, bytes: Vec<u8>) -> Self {
        match message_type {
            MessageType::Text => Payload::Text(String::from_utf8_lossy(&bytes).into_owned()),
            MessageType::Image => Payload::Image(bytes),
            MessageType::Sticker => Payload::Sticker(bytes),
            MessageType::Video => Payload::Video(bytes),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Text(text) => f.write_str(text),
            media => {
                let len = media.as_bytes().map_or(0, <[u8]>::len);
                write!(f, "<{}: {} bytes>", media.message_type().as_str(), len)
            }
        }
    }
}

/// A direct or group message.
///
/// `receiver` is a nickname for a direct message or a gid for a group post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    sender: String,
    receiver: String,
    payload: Payload,
}

impl Message {
    /// Create a new message instance
    pub fn new(sender: impl Into<String>, receiver: impl Into<String>, payload: Payload) -> Self {
        Self {
            sender: sender.into(),
            receiver: receiver.into(),
            payload,
        }
    }

    /// Create a text message
    pub fn text(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self::new(sender, receiver, Payload::Text(text.into()))
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn receiver(&self) -> &str {
        &self.receiver
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn message_type(&self) -> MessageType {
        self.payload.message_type()
    }

    pub fn is_text(&self) -> bool {
        matches!(self.payload, Payload::Text(_))
    }

    /// Text content for text messages
    pub fn text_content(&self) -> Option<&str> {
        self.payload.as_text()
    }

    /// Resolve a raw sender/receiver identifier to a human-readable label.
    ///
    /// Chat gids resolve to `"all"`, registered nicknames to the user's
    /// display name. Anything else, or a missing directory, returns `id` as is.
    pub fn peer_label<'a>(id: &'a str, directory: Option<&dyn PeerDirectory>) -> Cow<'a, str> {
        let Some(directory) = directory else {
            return Cow::Borrowed(id);
        };

        if directory.is_chat(id) {
            return Cow::Borrowed(BROADCAST_LABEL);
        }

        match directory.display_name(id) {
            Some(name) => Cow::Owned(name),
            None => Cow::Borrowed(id),
        }
    }

    /// Render as `"<sender> -> <receiver>: <payload>"` with peer labels resolved
    pub fn display_with<'a>(
        &'a self,
        directory: Option<&'a dyn PeerDirectory>,
    ) -> MessageDisplay<'a> {
        MessageDisplay {
            message: self,
            directory,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_with(None))
    }
}

/// Display adapter returned by [`Message::display_with`]
pub struct MessageDisplay<'a> {
    message: &'a Message,
    directory: Option<&'a dyn PeerDirectory>,
}

impl fmt::Display for MessageDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {}",
            Message::peer_label(&self.message.sender, self.directory),
            Message::peer_label(&self.message.receiver, self.directory),
            self.message.payload
        )
    }
}
