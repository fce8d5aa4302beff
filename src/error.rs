//! Error types for RepSync

use thiserror::Error;

/// Result type for RepSync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Error types for RepSync operations
#[derive(Error, Debug)]
pub enum SyncError {
    /// Inbound or outbound payload does not match the wire schema
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Send attempted without a live connection
    #[error("Not connected")]
    NotConnected,

    /// Connection could not be opened or broke mid-session
    #[error("Transport error: {0}")]
    Transport(String),

    /// Room endpoint could not be built from the server URL
    #[error("Invalid endpoint: {0}")]
    Endpoint(String),

    /// Camera did not produce a live stream
    #[error("Camera initialization failed: {0}")]
    CameraInit(String),

    /// Pose inference engine could not be loaded
    #[error("Pose inference initialization failed: {0}")]
    InferenceInit(String),

    /// A single frame could not be acquired
    #[error("Frame acquisition failed: {0}")]
    Frame(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// One or more session resources failed to release
    #[error("Release failed: {}", .0.join("; "))]
    Release(Vec<String>),
}

impl SyncError {
    /// True for failures that make a session impossible to start
    pub fn is_init_failure(&self) -> bool {
        matches!(self, SyncError::CameraInit(_) | SyncError::InferenceInit(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_message_lists_all_failures() {
        let err = SyncError::Release(vec!["camera busy".to_string(), "socket reset".to_string()]);
        assert_eq!(err.to_string(), "Release failed: camera busy; socket reset");
    }

    #[test]
    fn test_init_failures_are_distinct() {
        assert!(SyncError::CameraInit("no device".into()).is_init_failure());
        assert!(SyncError::InferenceInit("model missing".into()).is_init_failure());
        assert!(!SyncError::Frame("dropped".into()).is_init_failure());
    }
}
