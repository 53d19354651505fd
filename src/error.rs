//! Error types and handling for the Wildwatch dashboard

use thiserror::Error;

/// Main error type for the Wildwatch application
#[derive(Error, Debug)]
pub enum WildwatchError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// External API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Nothing left to chart after date parsing
    #[error("No data: {message}")]
    NoData { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// CSV encoding errors
    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },
}

impl WildwatchError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new no-data error
    pub fn no_data<S: Into<String>>(message: S) -> Self {
        Self::NoData {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WildwatchError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            WildwatchError::Api { message } => format!("Error: {message}"),
            WildwatchError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WildwatchError::NoData { message } => message.clone(),
            WildwatchError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            WildwatchError::Csv { .. } => "Failed to encode the CSV export.".to_string(),
        }
    }
}
