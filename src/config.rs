use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "spendbook", about = "Spendbook - personal expense tracking over MCP")]
pub struct CliArgs {
    /// Path to config file
    #[arg(short, long, default_value = "spendbook.toml")]
    pub config: String,

    /// Path to the SQLite store file (overrides config file)
    #[arg(short, long)]
    pub db_path: Option<PathBuf>,

    /// Log level (overrides config file)
    #[arg(short, long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_store")]
    pub store: StoreConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,

    #[serde(default = "default_resources")]
    pub resources: ResourcesConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Location of the single-file store. Resolved once at startup and
    /// threaded into every operation.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResourcesConfig {
    /// Categories document served at the category resource address. A
    /// missing file falls back to the built-in list.
    #[serde(default = "default_categories_file")]
    pub categories_file: PathBuf,
}

fn default_store() -> StoreConfig {
    StoreConfig {
        path: default_db_path(),
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        json: false,
    }
}

fn default_resources() -> ResourcesConfig {
    ResourcesConfig {
        categories_file: default_categories_file(),
    }
}

fn default_db_path() -> PathBuf {
    std::env::temp_dir().join("spendbook.db")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_categories_file() -> PathBuf {
    PathBuf::from("categories.json")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store: default_store(),
            logging: default_logging(),
            resources: default_resources(),
        }
    }
}

impl Config {
    pub fn load(cli: &CliArgs) -> Self {
        let mut config = match std::fs::read_to_string(&cli.config) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                eprintln!("Warning: Failed to parse config file: {}", e);
                Config::default()
            }),
            Err(_) => Config::default(),
        };

        // CLI overrides
        if let Some(ref path) = cli.db_path {
            config.store.path = path.clone();
        }
        if let Some(ref level) = cli.log_level {
            config.logging.level = level.clone();
        }

        config
    }
}
