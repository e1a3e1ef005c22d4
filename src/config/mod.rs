use anyhow::{Context, Result};
use dotenvy::dotenv;
use serde::Deserialize;

/// Output format for log lines written to stderr
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL
    #[serde(default)]
    pub database_url: Option<String>,
    /// Format of the log output
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize environment variables into Config struct
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>().context("invalid configuration in environment")?;

        Ok(config)
    }

    /// Build a configuration from an explicit set of variables instead of the process environment
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars).context("invalid configuration")?;
        Ok(config)
    }

    /// Replace the database URL, typically with a value given on the command line
    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if url.is_some() {
            self.database_url = url;
        }
        self
    }

    /// Get the database URL, failing if none was configured
    pub fn database_url(&self) -> Result<&str> {
        self.database_url
            .as_deref()
            .context("DATABASE_URL is not set; export it, put it in .env or pass --database-url")
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn reads_database_url_and_log_format() {
        let config = Config::from_vars(vars(&[
            ("DATABASE_URL", "postgres://postgres@localhost/clients_db"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();

        assert_eq!(
            config.database_url().unwrap(),
            "postgres://postgres@localhost/clients_db"
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn missing_url_is_reported_on_access() {
        let config = Config::from_vars(vars(&[])).unwrap();

        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.database_url().is_err());
    }

    #[test]
    fn command_line_url_overrides_environment() {
        let config = Config::from_vars(vars(&[("DATABASE_URL", "postgres://env/db")]))
            .unwrap()
            .with_database_url(Some("postgres://cli/db".to_string()));
        assert_eq!(config.database_url().unwrap(), "postgres://cli/db");

        let config = Config::from_vars(vars(&[("DATABASE_URL", "postgres://env/db")]))
            .unwrap()
            .with_database_url(None);
        assert_eq!(config.database_url().unwrap(), "postgres://env/db");
    }

    #[test]
    fn rejects_unknown_log_format() {
        assert!(Config::from_vars(vars(&[("LOG_FORMAT", "xml")])).is_err());
    }
}
