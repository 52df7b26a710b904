//! Error types for file generation.

use std::path::PathBuf;

use champsim_common::HashError;
use champsim_config::ConfigError;

/// Error type returned by content generators.
pub type GenerateError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while planning or writing generated files.
///
/// None of these are recovered from: every error aborts the run, and the
/// expected remedy is to fix the cause and run the generator again.
#[derive(Debug, thiserror::Error)]
pub enum FileWriteError {
    /// An I/O error occurred while creating, reading, or writing a file or directory.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration could not be serialized for hashing.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },

    /// The writer settings are incomplete or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A content generator failed.
    #[error("{stage} generator failed: {source}")]
    Generator {
        /// Which generator failed (e.g. "constants").
        stage: &'static str,
        /// The generator's error.
        source: GenerateError,
    },
}

impl From<HashError> for FileWriteError {
    fn from(err: HashError) -> Self {
        match err {
            HashError::Serialization { reason } => FileWriteError::Serialization { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let err = FileWriteError::Io {
            path: PathBuf::from("/tmp/obj/inc/champsim_constants.h"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("champsim_constants.h"));
    }

    #[test]
    fn serialization_from_hash_error() {
        let err: FileWriteError = HashError::Serialization {
            reason: "key must be a string".to_string(),
        }
        .into();
        assert!(matches!(err, FileWriteError::Serialization { .. }));
        assert!(err.to_string().contains("key must be a string"));
    }

    #[test]
    fn config_error_is_transparent() {
        let err: FileWriteError = ConfigError::MissingField("objdir".to_string()).into();
        assert_eq!(err.to_string(), "missing required field: objdir");
    }

    #[test]
    fn generator_error_display() {
        let err = FileWriteError::Generator {
            stage: "constants",
            source: "pmem has no channels".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("constants generator failed"));
        assert!(msg.contains("pmem has no channels"));
    }
}
