//! Integration tests for the chats crate.

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use messenger_chats::{Chat, ChatError, Message, Messenger, Payload, User};

    fn scenario() -> Messenger {
        let student_chat = Chat::new("gid1", "student chat")
            .with_members(["john1999", "james66", "anna2001"])
            .with_messages(vec![
                Message::text("anna2001", "gid1", "Hello everybody!"),
                Message::text("james66", "gid1", "Hi Anna!"),
                Message::text("john1999", "anna2001", "Hello!"),
            ]);
        let python_learners =
            Chat::new("gid2", "we learn python").with_members(["james66", "anna2001"]);
        let book_readers = Chat::new("gid3", "we read books");

        let john = User::new("john1999", "123456789", "john@gmail.com", "John", "Johnson")
            .with_chats(["gid1"]);
        let james = User::new("james66", "987654321", "james@mipt.ru", "James", "Jameson")
            .with_chats(["gid1", "gid2"])
            .with_friends(["anna2001"]);
        let anna = User::new("anna2001", "1122334455", "anna@yandex.ru", "Anna", "Peterson")
            .with_direct_messages(BTreeMap::from([(
                "james66".to_string(),
                vec![Message::text(
                    "anna2001",
                    "james66",
                    "Hi James, do you know python?",
                )],
            )]))
            .with_chats(["gid1", "gid2"])
            .with_friends(["james66"]);

        let mut messenger = Messenger::new(
            [john, james, anna],
            [student_chat, python_learners, book_readers],
        );

        messenger.add_user_to_chat("gid3", "james66").unwrap();
        messenger.add_user_to_chat("gid3", "anna2001").unwrap();
        messenger.add_user_to_chat("gid2", "john1999").unwrap();

        messenger.post_text("gid2", "john1999", "Hello everyone!").unwrap();
        messenger.post_text("gid2", "john1999", "How are you?").unwrap();
        messenger.post_text("gid2", "anna2001", "Ready to learn python!").unwrap();
        messenger.post_text("gid2", "james66", "Me too!").unwrap();
        messenger
            .post_text("gid2", "james66", "Hey python, ready or not, I'm here!")
            .unwrap();

        messenger
    }

    fn gids(chats: &[&Chat]) -> BTreeSet<String> {
        chats.iter().map(|chat| chat.gid().to_string()).collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn test_shared_chats_scenario() {
        let messenger = scenario();
        let anna = messenger.user("anna2001").unwrap();
        let james = messenger.user("james66").unwrap();
        let john = messenger.user("john1999").unwrap();

        let shared = messenger.get_shared_chats(&[anna, james]).unwrap();
        assert_eq!(gids(&shared), set(&["gid1", "gid2", "gid3"]));

        let shared = messenger.get_shared_chats(&[anna, john]).unwrap();
        assert_eq!(gids(&shared), set(&["gid1", "gid2"]));

        let shared = messenger.get_shared_chats(&[anna, james, john]).unwrap();
        assert_eq!(gids(&shared), set(&["gid1", "gid2"]));
    }

    #[test]
    fn test_single_user_gets_all_their_chats() {
        let messenger = scenario();
        let john = messenger.user("john1999").unwrap();

        let shared = messenger.get_shared_chats(&[john]).unwrap();
        assert_eq!(gids(&shared), john.chats().clone());
    }

    #[test]
    fn test_users_without_common_chat() {
        let mut messenger = scenario();
        messenger
            .register_user(User::new("loner", "0", "loner@example.com", "Lone", "Wolf"))
            .unwrap();
        messenger.register_chat(Chat::new("gid4", "solo")).unwrap();
        messenger.add_user_to_chat("gid4", "loner").unwrap();

        let shared = messenger
            .get_shared_chats_by_nickname(&["loner", "john1999"])
            .unwrap();
        assert!(shared.is_empty());
    }

    #[test]
    fn test_shared_chats_reads_live_membership() {
        let mut messenger = scenario();
        let before = messenger
            .get_shared_chats_by_nickname(&["john1999", "james66"])
            .unwrap()
            .len();
        assert_eq!(before, 2);

        messenger.add_user_to_chat("gid3", "john1999").unwrap();

        let after = messenger
            .get_shared_chats_by_nickname(&["john1999", "james66"])
            .unwrap();
        assert_eq!(gids(&after), set(&["gid1", "gid2", "gid3"]));
    }

    #[test]
    fn test_shared_chats_rejects_empty_and_unknown() {
        let messenger = scenario();

        assert_eq!(
            messenger.get_shared_chats(&[]).unwrap_err(),
            ChatError::EmptyUserList
        );
        assert_eq!(
            messenger
                .get_shared_chats_by_nickname::<&str>(&[])
                .unwrap_err(),
            ChatError::EmptyUserList
        );
        assert_eq!(
            messenger
                .get_shared_chats_by_nickname(&["anna2001", "ghost"])
                .unwrap_err(),
            ChatError::user_not_found("ghost")
        );
    }

    #[test]
    fn test_membership_is_bidirectional() {
        let messenger = scenario();

        for chat in messenger.chats() {
            for nickname in chat.members() {
                let user = messenger.user(nickname).unwrap();
                assert!(user.is_in_chat(chat.gid()), "{nickname} missing {}", chat.gid());
            }
        }
        assert!(messenger.ensure_integrity().is_ok());
    }

    #[test]
    fn test_keyword_search_in_python_chat() {
        let messenger = scenario();
        let chat = messenger.chat("gid2").unwrap();

        let found = chat.find_messages_with_words(&["python", "ready"]);
        let rendered: Vec<String> = found
            .iter()
            .map(|message| messenger.describe(message).to_string())
            .collect();
        assert_eq!(
            rendered,
            vec![
                "Anna Peterson -> all: Ready to learn python!",
                "James Jameson -> all: Hey python, ready or not, I'm here!",
            ]
        );

        let everything = chat.find_messages_with_words::<&str>(&[]);
        let log: Vec<&Message> = chat.messages().iter().collect();
        assert_eq!(everything, log);
        assert!(chat.find_messages_with_words(&["zzz-no-match"]).is_empty());
        assert_eq!(chat.find_messages_with_words(&["PYTHON"]).len(), 2);
    }

    #[test]
    fn test_search_ignores_media_payloads() {
        let mut messenger = scenario();
        messenger
            .post_message(
                "gid2",
                Message::new("anna2001", "gid2", Payload::Image(b"python ready".to_vec())),
            )
            .unwrap();

        messenger.post_text("gid2", "john1999", "Bye!").unwrap();

        let hits = messenger.search_chat("gid2", &["python", "ready"]).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|message| message.is_text()));

        let chat = messenger.chat("gid2").unwrap();
        let texts: Vec<&str> = chat
            .find_messages_with_words::<&str>(&[])
            .iter()
            .filter_map(|message| message.text_content())
            .collect();
        assert_eq!(
            texts,
            vec![
                "Hello everyone!",
                "How are you?",
                "Ready to learn python!",
                "Me too!",
                "Hey python, ready or not, I'm here!",
                "Bye!",
            ]
        );
        assert_eq!(chat.messages().len(), 7);
    }

    #[test]
    fn test_full_chat_rendering() {
        let messenger = scenario();
        let chat = messenger.chat("gid1").unwrap();

        let rendered: Vec<String> = chat
            .messages()
            .iter()
            .map(|message| messenger.describe(message).to_string())
            .collect();
        assert_eq!(
            rendered,
            vec![
                "Anna Peterson -> all: Hello everybody!",
                "James Jameson -> all: Hi Anna!",
                "John Johnson -> Anna Peterson: Hello!",
            ]
        );
    }

    #[test]
    fn test_peer_label_round_trip() {
        let messenger = scenario();

        let to_chat = Message::text("anna2001", "gid1", "x");
        let to_user = Message::text("anna2001", "john1999", "x");
        let to_unknown = Message::text("anna2001", "stranger42", "x");

        assert_eq!(messenger.describe(&to_chat).to_string(), "Anna Peterson -> all: x");
        assert_eq!(
            messenger.describe(&to_user).to_string(),
            "Anna Peterson -> John Johnson: x"
        );
        assert_eq!(
            messenger.describe(&to_unknown).to_string(),
            "Anna Peterson -> stranger42: x"
        );
        assert_eq!(to_chat.to_string(), "anna2001 -> gid1: x");
    }

    #[test]
    fn test_chat_display() {
        let messenger = scenario();
        let rendered: Vec<String> = messenger.chats().map(ToString::to_string).collect();

        assert_eq!(
            rendered,
            vec![
                "student chat: 3 user(s)",
                "we learn python: 3 user(s)",
                "we read books: 2 user(s)",
            ]
        );
    }

    #[test]
    fn test_direct_history_survives_bootstrap() {
        let mut messenger = scenario();
        messenger
            .send_direct_text("james66", "anna2001", "Yes, a bit!")
            .unwrap();

        let anna = messenger.user("anna2001").unwrap();
        let history: Vec<String> = anna
            .direct_messages_with("james66")
            .iter()
            .map(|message| messenger.describe(message).to_string())
            .collect();
        assert_eq!(
            history,
            vec![
                "Anna Peterson -> James Jameson: Hi James, do you know python?",
                "James Jameson -> Anna Peterson: Yes, a bit!",
            ]
        );

        let james = messenger.user("james66").unwrap();
        assert!(james.direct_messages_with("anna2001").is_empty());
    }

    #[test]
    fn test_directory_serializes_to_json() {
        let messenger = scenario();
        let json = serde_json::to_value(&messenger).unwrap();

        assert_eq!(json["chats"]["gid3"]["name"], "we read books");
        assert_eq!(json["users"]["anna2001"]["first_name"], "Anna");

        let restored: Messenger = serde_json::from_value(json).unwrap();
        assert_eq!(restored.chat("gid2"), messenger.chat("gid2"));
    }
}
