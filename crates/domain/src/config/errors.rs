use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not find config file: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file {path}: {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid configuration: {0}")]
    Validation(String),
}
