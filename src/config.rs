//! Environment driven configuration

use anyhow::Context;
use std::env;
use std::path::PathBuf;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Directory holding `messages.json` and `users.db`. Created on demand.
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    /// Directory for the rolling log files.
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("data"),
            static_dir: PathBuf::from("static"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl Config {
    /// Reads `HOST`, `PORT`, `DATA_DIR`, `STATIC_DIR` and `LOG_DIR`, after loading `.env` if
    /// present.
    pub fn from_env() -> anyhow::Result<Config> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let port = match env::var("PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("PORT must be a number, got {port:?}"))?,
            Err(_) => defaults.port,
        };

        Ok(Config {
            host: env::var("HOST").unwrap_or(defaults.host),
            port,
            data_dir: env::var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            log_dir: env::var("LOG_DIR").map(PathBuf::from).unwrap_or(defaults.log_dir),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("users.db")
    }

    pub fn messages_path(&self) -> PathBuf {
        self.data_dir.join("messages.json")
    }
}
