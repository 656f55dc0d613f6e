use std::fmt::Display;

use geozero::error::GeozeroError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid geometry value: {0}")]
    Validation(String),

    #[error("Supplied string is not a valid WKT-string.")]
    InvalidWkt(#[source] GeozeroError),

    #[error("Invalid geometry field declaration: {0}")]
    Configuration(String),

    #[error("Error while processing the geozero source.")]
    GeozeroError(#[from] GeozeroError),

    #[error("Serde error: {0}")]
    SerdeError(#[from] serde_json::error::Error),

    #[error("{0}")]
    Message(String),
}

/// The two families of failures callers need to tell apart.
///
/// Validation errors are raised per value and are recoverable; configuration
/// errors point at a broken field declaration and are raised once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Configuration,
}

impl Error {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Error::Validation(reason.into())
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::Validation(_)
            | Error::InvalidWkt(_)
            | Error::GeozeroError(_)
            | Error::SerdeError(_)
            | Error::Message(_) => ErrorKind::Validation,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl serde::de::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Message(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: Display,
    {
        Error::Message(msg.to_string())
    }
}

#[cfg(test)]
mod test {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(
            Error::Configuration("empty".into()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(Error::validation("nope").kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_wkt_error_keeps_cause() {
        let err = Error::InvalidWkt(GeozeroError::Geometry("unexpected token".into()));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.source().is_some());
    }
}
