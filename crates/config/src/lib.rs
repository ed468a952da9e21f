use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "messenger.toml",
    "config/messenger.toml",
    "crates/config/messenger.toml",
    "../messenger.toml",
    "../config/messenger.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Logging settings. `RUST_LOG` takes precedence over `filter`.
///
/// ```
/// use messenger_config::TelemetryConfig;
///
/// let telemetry = TelemetryConfig::default();
/// assert_eq!(telemetry.filter, "info");
/// assert!(!telemetry.ansi);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "TelemetryConfig::default_filter")]
    pub filter: String,
    #[serde(default)]
    pub ansi: bool,
}

impl TelemetryConfig {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
            ansi: false,
        }
    }
}

/// Where the initial population comes from. Without a path the built-in
/// demo population is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Run the integrity audit right after bootstrap and refuse broken seeds
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Emit query results as JSON instead of plain text
    #[serde(default)]
    pub json: bool,
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use messenger_config::load;
///
/// std::env::remove_var("MESSENGER_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.telemetry.filter.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("telemetry.filter", defaults.telemetry.filter.clone())
        .context("invalid default for telemetry.filter")?
        .set_default("telemetry.ansi", defaults.telemetry.ansi)
        .context("invalid default for telemetry.ansi")?
        .set_default("seed.strict", defaults.seed.strict)
        .context("invalid default for seed.strict")?
        .set_default("display.json", defaults.display.json)
        .context("invalid default for display.json")?;

    let environment_overrides = config::Environment::with_prefix("MESSENGER").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("MESSENGER_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via MESSENGER_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(?config, "loaded messenger configuration");
    Ok(config)
}
