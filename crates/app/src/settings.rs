use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        App {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Server {
    /// Bind address, `127.0.0.1` when absent.
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

/// Where the ledger lives. `memory` is for throwaway runs; data is gone when
/// the process exits.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Settings {
    /// Reads `settings.toml` (or any format the config crate knows) from the
    /// working directory.
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        config.try_deserialize()
    }
}
