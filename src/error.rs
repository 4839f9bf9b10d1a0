use actix_web::http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NodeError>;

/// Failures surfaced by ledger, peer and consensus operations.
#[derive(Debug, Error)]
pub enum NodeError {
    /// Malformed caller input: transaction fields or peer addresses.
    #[error("validation error: {0}")]
    Validation(String),

    /// The chain was read before the genesis block existed. Construction
    /// pushes genesis first, so this is defined but normally unreachable.
    #[error("chain is empty")]
    EmptyChain,

    /// A peer could not be contacted during consensus resolution. The
    /// resolver recovers by skipping the peer; this never aborts resolution.
    #[error("peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },

    /// An in-flight proof-of-work search was abandoned via the cancel signal.
    #[error("mining cancelled before a proof was found")]
    MiningCancelled,
}

impl actix_web::ResponseError for NodeError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::EmptyChain => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PeerUnreachable { .. } => StatusCode::BAD_GATEWAY,
            Self::MiningCancelled => StatusCode::CONFLICT,
        }
    }
}
