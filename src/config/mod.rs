use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};

use crate::core::relay::DEFAULT_QUEUE;
use crate::errors::{AppError, AppResult};

pub mod check;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_hash_cost")]
    pub hash_cost: u32,
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_queue_name")]
    pub queue_name: String,
    #[serde(default = "default_relay_timeout_ms")]
    pub relay_timeout_ms: u64,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_hash_cost() -> u32 {
    10
}
fn default_queue_name() -> String {
    DEFAULT_QUEUE.to_string()
}
fn default_relay_timeout_ms() -> u64 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            port: default_port(),
            hash_cost: default_hash_cost(),
            jwt_secret: String::new(),
            queue_name: default_queue_name(),
            relay_timeout_ms: default_relay_timeout_ms(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory (`~/.absensi`)
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".absensi")
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("absensi.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("absensi.sqlite")
    }

    /// Load configuration from the default file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Apply the process environment on top of the file values.
    pub fn apply_env(&mut self) -> AppResult<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Same as `apply_env`, with an injected variable lookup.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("PORT") {
            self.port = v
                .parse()
                .map_err(|_| AppError::Config(format!("invalid PORT: '{}'", v)))?;
        }
        if let Some(v) = lookup("DB_PATH") {
            self.database = v;
        }
        if let Some(v) = lookup("BCRYPT_HASH_COST") {
            self.hash_cost = v
                .parse()
                .map_err(|_| AppError::Config(format!("invalid BCRYPT_HASH_COST: '{}'", v)))?;
        }
        if let Some(v) = lookup("JWT_SECRET") {
            self.jwt_secret = v;
        }
        if let Some(v) = lookup("RELAY_QUEUE") {
            self.queue_name = v;
        }
        Ok(())
    }

    /// Secret used to sign tokens. Without a configured one, a random
    /// per-process secret is used and every token dies with the process.
    pub fn signing_secret(&self) -> String {
        if self.jwt_secret.is_empty() {
            warn!("no jwt_secret configured; using an ephemeral signing secret");
            uuid::Uuid::new_v4().simple().to_string()
        } else {
            self.jwt_secret.clone()
        }
    }

    pub fn relay_timeout(&self) -> Duration {
        Duration::from_millis(self.relay_timeout_ms)
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> io::Result<Config> {
        let dir = Self::config_dir();
        if !is_test {
            fs::create_dir_all(&dir)?;
        }

        // DB path: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)
                .map_err(|e| io::Error::other(format!("serialize error: {}", e)))?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            info!(path = %Self::config_file().display(), "config file written");
        }

        Ok(config)
    }
}
