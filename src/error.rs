use thiserror::Error;

use crate::dom::NodeId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Browser launch failed: {0}")]
    LaunchError(String),

    #[error("Navigation failed: {0}")]
    NavigationError(String),

    #[error("JavaScript error: {0}")]
    JsError(String),

    #[error("CDP error: {0}")]
    CdpError(#[from] chromiumoxide::error::CdpError),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Stale node handle: {0}")]
    StaleNode(NodeId),

    #[error("Document unavailable: {0}")]
    HostUnavailable(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the host document itself has failed.
    ///
    /// Fatal errors abort a scan; everything else is a per-field fault that
    /// the collector reports and moves past.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::CdpError(_) | Error::HostUnavailable(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
