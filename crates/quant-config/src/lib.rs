//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, BacktestSettings, DataSettings, LoggingConfig};

pub use config::ConfigError;
use config::{Config, Environment, File};
use std::path::Path;

/// Environment variable prefix; `QUANT__BACKTEST__COMMISSION=0.001` sets `backtest.commission`.
pub const ENV_PREFIX: &str = "QUANT";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    build(Some(path))
}

/// Load configuration from an optional file, falling back to defaults plus environment.
pub fn load_config_or_default(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    build(path)
}

fn build(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }
    let config = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate().map_err(ConfigError::Message)?;
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_file() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config.backtest.default_capital, 100_000.0);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quant.toml");
        fs::write(
            &path,
            r#"
[app]
name = "research"
environment = "test"

[logging]
level = "debug"
format = "json"

[backtest]
default_capital = 25000.0
commission = 0.001

[data]
csv_dir = "/srv/bars"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.app.name, "research");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.backtest.default_capital, 25_000.0);
        assert_eq!(config.backtest.commission, 0.001);
        assert_eq!(config.data.csv_dir, "/srv/bars");
        assert_eq!(config.data.sentiment_file, None);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[backtest]\ncommission = 1.5\n").unwrap();
        assert!(load_config(&path).is_err());

        fs::write(&path, "[logging]\nformat = \"xml\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(load_config(Path::new("/no/such/quant.toml")).is_err());
    }
}
