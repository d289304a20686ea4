// ABOUTME: Layered runtime settings: built-in defaults, optional TOML file, environment
// ABOUTME: Environment keys are DIARY_ prefixed with '_' between sections, e.g. DIARY_SERVER_PORT

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "coffee_diary.toml";

#[derive(Debug, Deserialize)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Server {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    /// Default `tracing` filter; `RUST_LOG` takes precedence when set.
    pub filter: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub database: Database,
    pub log: Log,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_file(CONFIG_FILE)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 6060)?
            .set_default("database.url", "sqlite:coffee_diary.db?mode=rwc")?
            .set_default("log.filter", "info")?
            .add_source(File::with_name(path).format(FileFormat::Toml).required(false))
            .add_source(Environment::with_prefix("DIARY").separator("_"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env::{remove_var, set_var};

    #[test]
    #[serial]
    fn defaults_apply_without_file_or_env() {
        let settings = Settings::from_file("does-not-exist.toml").unwrap();
        assert_eq!(settings.server.address(), "0.0.0.0:6060");
        assert_eq!(settings.database.url, "sqlite:coffee_diary.db?mode=rwc");
        assert_eq!(settings.log.filter, "info");
    }

    #[test]
    #[serial]
    fn file_then_environment_override_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("diary.toml");
        std::fs::write(
            &path,
            "[server]\nport = 7070\n\n[database]\nurl = \"sqlite::memory:\"\n",
        )
        .unwrap();

        set_var("DIARY_SERVER_HOST", "127.0.0.1");
        let settings = Settings::from_file(path.to_str().unwrap());
        remove_var("DIARY_SERVER_HOST");

        let settings = settings.unwrap();
        assert_eq!(settings.server.address(), "127.0.0.1:7070");
        assert_eq!(settings.database.url, "sqlite::memory:");
    }
}
