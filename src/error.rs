use thiserror::Error;

/// Failure raised by the HTTP layer talking to Jenkins.
///
/// Callers of [`crate::JenkinsService`] never match on these directly; they
/// arrive wrapped in [`JenkinsError::Jenkins`] and are reachable through
/// [`std::error::Error::source`].
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("API request failed (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Build #{number} not found for job {job}")]
    BuildNotFound { job: String, number: i64 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The single error type surfaced by every Jenkins operation.
#[derive(Error, Debug)]
pub enum JenkinsError {
    /// Rejected before any remote call was made.
    #[error("Invalid build number {0}: must be greater than 0")]
    InvalidBuildNumber(i64),

    #[error("Jenkins operation failed: {0}")]
    Jenkins(#[source] ClientError),
}

impl From<ClientError> for JenkinsError {
    fn from(err: ClientError) -> Self {
        JenkinsError::Jenkins(err)
    }
}

impl From<reqwest::Error> for JenkinsError {
    fn from(err: reqwest::Error) -> Self {
        JenkinsError::Jenkins(err.into())
    }
}

impl From<serde_json::Error> for JenkinsError {
    fn from(err: serde_json::Error) -> Self {
        JenkinsError::Jenkins(err.into())
    }
}

impl From<std::io::Error> for JenkinsError {
    fn from(err: std::io::Error) -> Self {
        JenkinsError::Jenkins(err.into())
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

pub type Result<T> = std::result::Result<T, JenkinsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_client_error_is_wrapped_with_source() {
        let err: JenkinsError = ClientError::JobNotFound("myJob".to_string()).into();

        assert!(matches!(err, JenkinsError::Jenkins(_)));
        assert!(err.to_string().contains("myJob"));
        assert_eq!(err.source().unwrap().to_string(), "Job not found: myJob");
    }

    #[test]
    fn test_io_error_converts_through_client_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: JenkinsError = io.into();

        assert!(matches!(err, JenkinsError::Jenkins(ClientError::Io(_))));
    }

    #[test]
    fn test_invalid_build_number_message() {
        let err = JenkinsError::InvalidBuildNumber(0);
        assert_eq!(
            err.to_string(),
            "Invalid build number 0: must be greater than 0"
        );
        assert!(err.source().is_none());
    }
}
