//! Error types and handling for the `DineMap` library

use thiserror::Error;

/// Main error type for the `DineMap` library
#[derive(Error, Debug)]
pub enum DineMapError {
    /// No authenticated user identity is available
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The user's own coordinate has not been resolved yet
    #[error("User location unavailable")]
    LocationUnavailable,

    /// Fetching the favourite-ID set from the remote store failed
    #[error("Favourite fetch failed: {message}")]
    FavouriteFetch { message: String },

    /// Remote document store communication errors
    #[error("Store error: {message}")]
    Store { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DineMapError {
    /// Create a new favourite-fetch error
    pub fn favourite_fetch<S: Into<String>>(message: S) -> Self {
        Self::FavouriteFetch {
            message: message.into(),
        }
    }

    /// Create a new store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DineMapError::NotAuthenticated => {
                "Please sign in to see your favourite restaurants.".to_string()
            }
            DineMapError::LocationUnavailable => {
                "Waiting for your location. Make sure location access is enabled.".to_string()
            }
            DineMapError::FavouriteFetch { .. } | DineMapError::Store { .. } => {
                "Unable to reach the restaurant service. Please check your internet connection."
                    .to_string()
            }
            DineMapError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            DineMapError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let store_err = DineMapError::store("connection refused");
        assert!(matches!(store_err, DineMapError::Store { .. }));

        let fav_err = DineMapError::favourite_fetch("timeout");
        assert!(matches!(fav_err, DineMapError::FavouriteFetch { .. }));

        let config_err = DineMapError::config("missing base url");
        assert!(matches!(config_err, DineMapError::Config { .. }));
    }

    #[test]
    fn test_user_messages() {
        assert!(
            DineMapError::NotAuthenticated
                .user_message()
                .contains("sign in")
        );
        assert!(
            DineMapError::LocationUnavailable
                .user_message()
                .contains("location")
        );
        assert!(
            DineMapError::store("test")
                .user_message()
                .contains("Unable to reach")
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DineMapError = io_err.into();
        assert!(matches!(err, DineMapError::Io { .. }));
    }
}
