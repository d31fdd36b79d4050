use crate::error::ConfigError;
use config::builder::DefaultState;
use config::ConfigBuilder;
use std::env;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{DatabaseSettings, ServerOverrides, ServerSettings, Settings};

/// Prefix for environment overrides, e.g. `STOCKD_SERVER__PORT=8080`.
const ENV_PREFIX: &str = "STOCKD";

/// Connection-string variables honoured as a fallback for `database.url`,
/// in order of preference.
const DATABASE_URL_VARS: [&str; 2] = ["POSTGRES_URL", "DATABASE_URL"];

/// Loads the service configuration once, at startup.
///
/// Sources, lowest precedence first:
/// 1. built-in defaults, plus `POSTGRES_URL` / `DATABASE_URL` for the connection string,
/// 2. the TOML file at `path`, or an optional `config.toml` in the working directory,
/// 3. `STOCKD_*` environment variables (`__` separates nested keys).
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = base_builder()?;

    if let Some(url) = DATABASE_URL_VARS.iter().find_map(|var| env::var(var).ok()) {
        builder = builder.set_default("database.url", url)?;
    }

    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("config.toml").required(false),
    };

    let builder = builder.add_source(file).add_source(
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    from_builder(builder)
}

/// Builder pre-populated with the defaults every deployment starts from.
fn base_builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("database.url", "")?
        .set_default("database.max_connections", 10)?
        .set_default("database.acquire_timeout_secs", 5)?;
    Ok(builder)
}

fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    let settings = builder.build()?.try_deserialize::<Settings>()?;
    let settings = settings.validate()?;
    tracing::debug!(
        host = %settings.server.host,
        port = settings.server.port,
        max_connections = settings.database.max_connections,
        "configuration loaded"
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use std::io::Write;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        let builder = base_builder()?.add_source(config::File::from_str(toml, FileFormat::Toml));
        from_builder(builder)
    }

    #[test]
    fn defaults_fill_everything_but_the_url() {
        let settings = from_toml(
            r#"
            [database]
            url = "postgres://localhost/stocksdb"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.database.max_connections, 10);
        assert_eq!(settings.database.acquire_timeout().as_secs(), 5);
    }

    #[test]
    fn missing_url_is_a_validation_error() {
        let err = from_toml("").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("database.url")));
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let err = from_toml(
            r#"
            [database]
            url = "postgres://localhost/stocksdb"
            max_connections = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn bad_host_is_rejected() {
        let err = from_toml(
            r#"
            [server]
            host = "not an ip"

            [database]
            url = "postgres://localhost/stocksdb"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(msg) if msg.contains("server.host")));
    }

    #[test]
    fn cli_overrides_win() {
        let settings = from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [database]
            url = "postgres://localhost/stocksdb"
            "#,
        )
        .unwrap()
        .with_overrides(&ServerOverrides {
            host: None,
            port: Some(9090),
        });

        assert_eq!(
            settings.server.socket_addr().unwrap().to_string(),
            "127.0.0.1:9090"
        );
    }

    #[test]
    fn explicit_file_is_loaded() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 4000\n\n[database]\nurl = \"postgres://db.internal/stocksdb\"\nmax_connections = 3"
        )
        .unwrap();

        let settings = load_settings(Some(file.path())).unwrap();
        assert_eq!(settings.database.url, "postgres://db.internal/stocksdb");
        assert_eq!(settings.database.max_connections, 3);
    }

    #[test]
    fn explicit_file_must_exist() {
        let missing = Path::new("/definitely/not/here/stockd.toml");
        assert!(matches!(
            load_settings(Some(missing)),
            Err(ConfigError::LoadError(_))
        ));
    }
}
