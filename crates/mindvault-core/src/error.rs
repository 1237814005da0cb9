//! Error types for Mind Vault

use std::path::PathBuf;

/// Mind Vault error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Window not found: {0}")]
    WindowNotFound(String),

    #[error("Strategy not found: {0}")]
    StrategyNotFound(String),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported ebook format: {0}")]
    UnsupportedEbook(String),

    #[error("Invalid export data: {0}")]
    InvalidExportData(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Hardware acceleration error: {0}")]
    HardwareError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Result type alias for Mind Vault
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::ConfigError(msg.into())
    }

    pub fn hardware<S: Into<String>>(msg: S) -> Self {
        Error::HardwareError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedFormat("xml".to_string());
        assert_eq!(err.to_string(), "Unsupported export format: xml");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::IoError(_)));
    }
}
