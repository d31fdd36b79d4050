use thiserror::Error;

/// Why the service settings could not be produced at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source (defaults, TOML file or `STOCKD_*` environment) failed to load
    /// or did not deserialize into `Settings`.
    #[error("Failed to load service settings: {0}")]
    LoadError(#[from] config::ConfigError),

    /// The settings loaded but cannot be used to serve requests.
    #[error("Invalid service settings: {0}")]
    ValidationError(String),
}
