//! Referential integrity findings reported by the directory audit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single broken reference between the registries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityViolation {
    /// A chat lists a member that is not in the user registry
    UnknownMember { gid: String, nickname: String },
    /// A user lists a chat that is not in the chat registry
    UnknownChat { nickname: String, gid: String },
    /// A user lists a chat whose member set does not contain them
    MembershipMismatch { nickname: String, gid: String },
    /// A chat lists a registered member whose chat set does not contain it
    MemberMissingChat { gid: String, nickname: String },
    /// A chat message is addressed to neither a chat nor a user
    UnknownReceiver { gid: String, receiver: String },
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMember { gid, nickname } => {
                write!(f, "chat {gid} lists unknown member {nickname}")
            }
            Self::UnknownChat { nickname, gid } => {
                write!(f, "user {nickname} lists unknown chat {gid}")
            }
            Self::MembershipMismatch { nickname, gid } => {
                write!(f, "user {nickname} lists chat {gid} but is not one of its members")
            }
            Self::MemberMissingChat { gid, nickname } => {
                write!(f, "chat {gid} lists member {nickname} but {nickname} does not list the chat")
            }
            Self::UnknownReceiver { gid, receiver } => {
                write!(f, "chat {gid} holds a message for unknown receiver {receiver}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display() {
        let violation = IntegrityViolation::MembershipMismatch {
            nickname: "john1999".to_string(),
            gid: "gid3".to_string(),
        };
        assert_eq!(
            violation.to_string(),
            "user john1999 lists chat gid3 but is not one of its members"
        );

        let violation = IntegrityViolation::MemberMissingChat {
            gid: "gid3".to_string(),
            nickname: "anna2001".to_string(),
        };
        assert_eq!(
            violation.to_string(),
            "chat gid3 lists member anna2001 but anna2001 does not list the chat"
        );
    }

    #[test]
    fn test_violation_serializes_with_kind_tag() {
        let violation = IntegrityViolation::UnknownReceiver {
            gid: "gid1".to_string(),
            receiver: "nobody".to_string(),
        };
        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["kind"], "unknown_receiver");
        assert_eq!(json["receiver"], "nobody");
    }
}
