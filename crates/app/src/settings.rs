//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and `FLOUR_MILL__*` environment variables.
//!
//! ```toml
//! [app]
//! level = "debug"
//!
//! [server]
//! port = 10001
//! database = { sqlite = "flour_mill.db" }
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    /// Path of the SQLite file, created when missing.
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
    pub cors: bool,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(Environment::with_prefix("FLOUR_MILL").separator("__")),
        )
    }

    fn from_config(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .set_default("app.level", "info")?
            .set_default("server.bind", "127.0.0.1")?
            .set_default("server.port", 10001)?
            .set_default("server.database", "memory")?
            .set_default("server.cors", true)?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    #[test]
    fn defaults_apply_without_sources() {
        let settings = Settings::from_config(Config::builder()).unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.bind, "127.0.0.1");
        assert_eq!(settings.server.port, 10001);
        assert_eq!(settings.server.database, Database::Memory);
        assert!(settings.server.cors);
    }

    #[test]
    fn sqlite_database_from_toml() {
        let builder = Config::builder().add_source(File::from_str(
            r#"
            [server]
            port = 8080
            cors = false
            database = { sqlite = "mill.db" }
            "#,
            FileFormat::Toml,
        ));
        let settings = Settings::from_config(builder).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert!(!settings.server.cors);
        assert_eq!(
            settings.server.database,
            Database::Sqlite("mill.db".to_string())
        );
    }
}
