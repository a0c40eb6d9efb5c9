//! Error types for the cleaning pipeline

use thiserror::Error;

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the caller for a single file.
///
/// All of these are deterministic input errors: retrying with the same input
/// gives the same outcome, so nothing in the crate retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The file extension is not one of the known tabular formats
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    /// The bytes are malformed for the selected decoder
    #[error("Failed to parse {format} data: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// A projection referenced a column the table does not have
    #[error("Unknown column: {name}")]
    UnknownColumn { name: String },

    /// The table cannot be encoded in the target format
    #[error("Failed to serialize {format}: {message}")]
    Serialization {
        format: &'static str,
        message: String,
    },
}

impl Error {
    pub(crate) fn parse(format: &'static str, message: impl Into<String>) -> Self {
        Error::Parse {
            format,
            message: message.into(),
        }
    }

    pub(crate) fn serialization(format: &'static str, message: impl Into<String>) -> Self {
        Error::Serialization {
            format,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnsupportedFormat {
            extension: "txt".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported file format: txt");

        let err = Error::parse("CSV", "found record with 3 fields, expected 2");
        assert_eq!(
            err.to_string(),
            "Failed to parse CSV data: found record with 3 fields, expected 2"
        );

        let err = Error::UnknownColumn {
            name: "salary".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown column: salary");
    }
}
