use std::io::{self, Write};

use anyhow::Context;
use clap::{Parser, Subcommand};
use messenger_chats::{Chat, Messenger};
use messenger_config::{load as load_config, AppConfig};
use messenger_runtime::{bootstrap, demo_population, telemetry};
use serde_json::json;
use tracing::info;

#[derive(Parser)]
#[command(name = "messenger")]
#[command(about = "In-memory messenger driver (demo by default)")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the built-in scenario: joins, posts, search and shared chats
    Demo,
    /// Print a chat and its full history
    Show { gid: String },
    /// Find text messages in a chat containing every word
    Search {
        gid: String,
        words: Vec<String>,
    },
    /// List the chats every given user belongs to
    Shared {
        #[arg(required = true)]
        nicknames: Vec<String>,
    },
    /// Audit the directory for broken references
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config().context("failed to load configuration")?;
    telemetry::init_tracing(&config.telemetry).context("failed to initialise tracing")?;

    let json = cli.json || config.display.json;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Commands::Demo) {
        Commands::Demo => run_demo(&mut demo_population(), &mut out),
        Commands::Show { gid } => show_chat(&directory(&config)?, &gid, json, &mut out),
        Commands::Search { gid, words } => search(&directory(&config)?, &gid, &words, json, &mut out),
        Commands::Shared { nicknames } => shared(&directory(&config)?, &nicknames, json, &mut out),
        Commands::Check => check(&directory(&config)?, json, &mut out),
    }
}

fn directory(config: &AppConfig) -> anyhow::Result<Messenger> {
    bootstrap(config).context("failed to bootstrap directory")
}

fn run_demo(messenger: &mut Messenger, out: &mut impl Write) -> anyhow::Result<()> {
    info!("running demo scenario");

    messenger.add_user_to_chat("gid3", "james66")?;
    messenger.add_user_to_chat("gid3", "anna2001")?;

    messenger.add_user_to_chat("gid2", "john1999")?;
    messenger.post_text("gid2", "john1999", "Hello everyone!")?;
    messenger.post_text("gid2", "john1999", "How are you?")?;
    messenger.post_text("gid2", "anna2001", "Ready to learn python!")?;
    messenger.post_text("gid2", "james66", "Me too!")?;
    messenger.post_text("gid2", "james66", "Hey python, ready or not, I'm here!")?;

    let python_learners = messenger
        .chat("gid2")
        .context("demo population has no gid2")?;

    writeln!(out, "Full '{}' chat:", python_learners.name())?;
    for message in python_learners.messages() {
        writeln!(out, "{}", messenger.describe(message))?;
    }

    let keywords = ["python", "ready"];
    writeln!(
        out,
        "Search in '{}' by words: {:?}",
        python_learners.name(),
        keywords
    )?;
    for message in python_learners.find_messages_with_words(&keywords) {
        writeln!(out, "{}", messenger.describe(message))?;
    }

    for nicknames in [["anna2001", "james66"], ["anna2001", "john1999"]] {
        let names: Vec<String> = nicknames
            .iter()
            .filter_map(|nickname| messenger.user(nickname))
            .map(ToString::to_string)
            .collect();
        let chats = messenger.get_shared_chats_by_nickname(&nicknames)?;

        writeln!(out, "Common chats for {names:?}:")?;
        writeln!(out, "{:?}", chat_labels(&chats))?;
    }

    Ok(())
}

fn chat_labels(chats: &[&Chat]) -> Vec<String> {
    chats.iter().map(ToString::to_string).collect()
}

fn chat_summary(chat: &Chat) -> serde_json::Value {
    json!({
        "gid": chat.gid(),
        "name": chat.name(),
        "members": chat.members(),
    })
}

fn show_chat(messenger: &Messenger, gid: &str, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let chat = messenger
        .chat(gid)
        .with_context(|| format!("chat {gid} is not registered"))?;

    if json {
        serde_json::to_writer_pretty(&mut *out, chat)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{chat}")?;
    for message in chat.messages() {
        writeln!(out, "{}", messenger.describe(message))?;
    }
    Ok(())
}

fn search(
    messenger: &Messenger,
    gid: &str,
    words: &[String],
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let found = messenger.search_chat(gid, words)?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &found)?;
        writeln!(out)?;
        return Ok(());
    }

    for message in found {
        writeln!(out, "{}", messenger.describe(message))?;
    }
    Ok(())
}

fn shared(
    messenger: &Messenger,
    nicknames: &[String],
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let chats = messenger.get_shared_chats_by_nickname(nicknames)?;

    if json {
        let summaries: Vec<_> = chats.iter().map(|chat| chat_summary(chat)).collect();
        serde_json::to_writer_pretty(&mut *out, &summaries)?;
        writeln!(out)?;
        return Ok(());
    }

    for chat in chats {
        writeln!(out, "{} {}", chat.gid(), chat)?;
    }
    Ok(())
}

fn check(messenger: &Messenger, json: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let violations = messenger.verify_integrity();

    if json {
        serde_json::to_writer_pretty(&mut *out, &violations)?;
        writeln!(out)?;
    } else if violations.is_empty() {
        writeln!(out, "directory is consistent")?;
    } else {
        for violation in &violations {
            writeln!(out, "{violation}")?;
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} integrity violation(s) found", violations.len())
    }
}
