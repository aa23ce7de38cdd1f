//! Crate-level error types
//!
//! Core operations never fail; these cover process-level setup such as
//! loading configuration and binding the listener.

use std::net::AddrParseError;

/// Result alias for process-level operations
pub type Result<T> = std::result::Result<T, Error>;

/// Process-level errors
#[derive(Debug)]
pub enum Error {
    /// I/O failure (bind, accept, log file)
    Io(std::io::Error),
    /// Configuration could not be loaded or parsed
    Config(config::ConfigError),
    /// A bind address could not be parsed
    InvalidAddress(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::InvalidAddress(addr) => write!(f, "Invalid address: {}", addr),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Config(e) => Some(e),
            Error::InvalidAddress(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<AddrParseError> for Error {
    fn from(e: AddrParseError) -> Self {
        Error::InvalidAddress(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use super::*;

    #[test]
    fn test_from_addr_parse() {
        let err: Error = "not-an-address".parse::<SocketAddr>().unwrap_err().into();
        assert!(matches!(err, Error::InvalidAddress(_)));
        assert!(err.to_string().starts_with("Invalid address"));
    }

    #[test]
    fn test_io_source() {
        use std::error::Error as _;

        let err = Error::from(std::io::Error::new(std::io::ErrorKind::AddrInUse, "taken"));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "I/O error: taken");
    }
}
