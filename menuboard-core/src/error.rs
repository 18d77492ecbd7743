use thiserror::Error;

/// Generic message shown on the display whenever sync ends in an error.
pub const ERROR_MESSAGE: &str = "Error loading sheet data.";

/// Everything that can push the sync state machine into `Error`.
/// Compared structurally as part of [`SyncState`](crate::sync::SyncState).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Network failure or an unexpected HTTP status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered 404: nothing has been published yet.
    #[error("no snapshot published: {0}")]
    NotFound(String),

    /// The self-registration request failed.
    #[error("device registration failed: {0}")]
    Registration(String),

    /// The persisted device identity could not be read or written.
    #[error("local state unavailable: {0}")]
    LocalState(String),

    /// The response body was not a snapshot at all.
    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

impl SyncError {
    /// The message a kiosk shows for this error. The same for every
    /// variant; the detail goes to the log.
    pub fn display_message(&self) -> &'static str {
        ERROR_MESSAGE
    }
}

/// Failures of the persistent key-value store behind [`LocalState`](crate::vault::LocalState).
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("vault lock poisoned")]
    Poisoned,
}

impl From<VaultError> for SyncError {
    fn from(err: VaultError) -> Self {
        SyncError::LocalState(err.to_string())
    }
}
