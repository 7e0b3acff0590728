//! Errors raised while loading credentials and resolving signing

use signet_core::error::{Error, ErrorCode};
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for signing operations
pub type Result<T> = std::result::Result<T, SigningError>;

/// Signing resolution failures
#[derive(Error, Debug)]
pub enum SigningError {
    /// All credentials present but the keystore does not exist
    #[error("Keystore file not found: {}", .0.display())]
    MissingKeystoreFile(PathBuf),

    /// A config the resolver needs is not registered
    #[error("Signing config '{0}' not found")]
    SigningConfigNotFound(String),

    /// A config with this name is already registered
    #[error("Signing config '{0}' already exists")]
    DuplicateSigningConfig(String),

    /// Malformed properties text
    #[error("Invalid properties syntax at line {line}: {message}")]
    Syntax {
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },

    /// Malformed properties file
    #[error("Failed to parse {}: line {line}: {message}", path.display())]
    PropertiesParse {
        /// File being parsed
        path: PathBuf,
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },

    /// File could not be read or inspected
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Refusing to overwrite a file
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
}

impl From<SigningError> for Error {
    fn from(err: SigningError) -> Self {
        let message = err.to_string();
        match err {
            SigningError::MissingKeystoreFile(path) => Error::missing_keystore_file(path),
            SigningError::SigningConfigNotFound(_) => {
                Error::new(ErrorCode::SigningConfigNotFound, message)
            }
            SigningError::DuplicateSigningConfig(_) => {
                Error::new(ErrorCode::DuplicateSigningConfig, message)
            }
            SigningError::Syntax { .. } | SigningError::PropertiesParse { .. } => {
                Error::config_parse(message).with_suggestion("Fix the malformed line in key.properties")
            }
            SigningError::Io { source, .. } => {
                let code = match source.kind() {
                    std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
                    _ => ErrorCode::IoError,
                };
                Error::new(code, message).with_source(source)
            }
            SigningError::AlreadyExists(path) => Error::file_exists(path),
        }
    }
}
