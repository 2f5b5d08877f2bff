use hierarchy::attendance::AttendanceError;
use hierarchy::normalize::NormalizeError;
use hierarchy::{FilterError, HierarchyError};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("location permission denied")]
    Denied,
    #[error("location request timed out after {0:?}")]
    Timeout(Duration),
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The server answered with a non-success status; `message` is the
    /// envelope's message when it sent one.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },
    #[error("session expired, log in again")]
    AuthExpired,
    #[error("not logged in")]
    NotLoggedIn,
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Attendance(#[from] AttendanceError),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Whether the caller has to route back to the login screen.
    pub fn needs_login(&self) -> bool {
        matches!(self, ClientError::AuthExpired | ClientError::NotLoggedIn)
    }
}
