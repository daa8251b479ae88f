use thiserror::Error;

/// Failure reported by a handshake collaborator (platform gateway, auth API,
/// or user cache).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("cache error: {0}")]
    Cache(String),
}
