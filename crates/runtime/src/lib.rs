use anyhow::{Context, Result};
use messenger_chats::Messenger;
use messenger_config::AppConfig;
use tracing::{info, warn};

pub mod seed;

pub use seed::{demo_population, SeedData};

pub mod telemetry {
    use anyhow::Result;
    use messenger_config::TelemetryConfig;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Install the global subscriber. Logs go to stderr so stdout stays clean for output.
    pub fn init_tracing(config: &TelemetryConfig) -> Result<()> {
        let env_filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .with_ansi(config.ansi)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Build the directory from the configured seed file, or the demo population.
pub fn bootstrap(config: &AppConfig) -> Result<Messenger> {
    let messenger = match &config.seed.path {
        Some(path) => {
            info!(path = %path.display(), "loading seed file");
            SeedData::from_file(path)?
                .into_messenger()
                .context("failed to build directory from seed file")?
        }
        None => demo_population(),
    };

    if config.seed.strict {
        messenger
            .ensure_integrity()
            .context("seed population failed the integrity check")?;
    } else {
        let violations = messenger.verify_integrity();
        if !violations.is_empty() {
            warn!(count = violations.len(), "seed population has integrity violations");
        }
    }

    info!(
        users = messenger.user_count(),
        chats = messenger.chat_count(),
        "directory ready"
    );
    Ok(messenger)
}
