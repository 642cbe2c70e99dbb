use thiserror::Error;

/// Failure to obtain a batch of questions.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be completed.
    #[error("failed to fetch trivia questions: {0}")]
    Transport(#[from] TransportError),
    /// The source answered but reported a logical failure.
    #[error("{0}")]
    Source(#[from] SourceError),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}")]
    Status { status: reqwest::StatusCode },
}

/// Non-zero `response_code` reported by the trivia source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("no results for given filters")]
    NoResults,
    #[error("invalid parameter combination")]
    InvalidParameter,
    #[error("session token not found")]
    TokenNotFound,
    #[error("no fresh questions remain for token")]
    TokenEmpty,
    #[error("unknown source error (code {0})")]
    Unknown(i64),
}

impl SourceError {
    /// Map a response code to an error. Code 0 means success.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => None,
            1 => Some(SourceError::NoResults),
            2 => Some(SourceError::InvalidParameter),
            3 => Some(SourceError::TokenNotFound),
            4 => Some(SourceError::TokenEmpty),
            other => Some(SourceError::Unknown(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_mapping() {
        assert_eq!(SourceError::from_code(0), None);
        assert_eq!(SourceError::from_code(1), Some(SourceError::NoResults));
        assert_eq!(SourceError::from_code(2), Some(SourceError::InvalidParameter));
        assert_eq!(SourceError::from_code(3), Some(SourceError::TokenNotFound));
        assert_eq!(SourceError::from_code(4), Some(SourceError::TokenEmpty));
        assert_eq!(SourceError::from_code(7), Some(SourceError::Unknown(7)));
    }

    #[test]
    fn test_source_error_messages() {
        assert_eq!(SourceError::NoResults.to_string(), "no results for given filters");
        assert!(SourceError::Unknown(9).to_string().starts_with("unknown source error"));

        let err = FetchError::from(SourceError::TokenEmpty);
        assert_eq!(err.to_string(), "no fresh questions remain for token");
    }
}
