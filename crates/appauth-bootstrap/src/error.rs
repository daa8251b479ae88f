use appauth_types::CollaboratorError;
use thiserror::Error;

/// Outcome of a failed handshake.
///
/// Which step failed is deliberately not part of the type; the collaborator's
/// own error is kept as the source for diagnostics.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to register application {app_id}")]
    Registration {
        app_id: String,
        #[source]
        source: CollaboratorError,
    },
}

impl BootstrapError {
    /// The application the failed handshake was for, if it got that far.
    pub fn app_id(&self) -> Option<&str> {
        match self {
            Self::InvalidConfig(_) => None,
            Self::Registration { app_id, .. } => Some(app_id),
        }
    }
}
