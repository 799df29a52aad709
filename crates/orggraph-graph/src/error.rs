//! Error types for the graph access layer and the importer.

use std::path::PathBuf;

use thiserror::Error;

/// Failures at the session/wire level, before they are classified by the
/// operation that hit them.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to connect to {endpoint}: {message}")]
    Connect { endpoint: String, message: String },

    #[error("session is closed")]
    Closed,

    #[error("remote engine returned status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed frame: {0}")]
    Protocol(String),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TransportError {
    /// Remote status code, when the engine answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn is_session_failure(&self) -> bool {
        matches!(self, Self::Connect { .. } | Self::Closed | Self::WebSocket(_))
    }
}

/// Errors surfaced by [`crate::GraphClient`] operations.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Connection error: {message}")]
    Connection { message: String, status: Option<u16> },

    #[error("Write rejected: {message}")]
    Write { message: String, status: Option<u16> },

    #[error("Query failed: {message}")]
    Query { message: String, status: Option<u16> },

    #[error("Invalid entity: {0}")]
    InvalidEntity(String),

    #[error("Unexpected response: {0}")]
    Protocol(String),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// What kind of operation a transport failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    /// Liveness probe and counts: every failure is a connection failure.
    Probe,
    Write,
    Read,
}

impl GraphError {
    pub(crate) fn from_transport(op: Operation, err: TransportError) -> Self {
        let status = err.status();
        let session_failure = err.is_session_failure();
        let message = err.to_string();

        match op {
            Operation::Probe => Self::Connection { message, status },
            _ if session_failure => Self::Connection { message, status },
            Operation::Write => Self::Write { message, status },
            Operation::Read => Self::Query { message, status },
        }
    }

    /// Remote status code, when known.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Connection { status, .. } | Self::Write { status, .. } | Self::Query { status, .. } => *status,
            _ => None,
        }
    }
}

/// Errors surfaced by the bulk importer.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Result type for import operations.
pub type ImportResult<T> = Result<T, ImportError>;
