use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodewipeError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Gateway timed out: {0}")]
    Timeout(String),

    #[error("Invalid node list: {0}")]
    InvalidNodeList(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, NodewipeError>;

impl From<std::io::Error> for NodewipeError {
    fn from(e: std::io::Error) -> Self {
        NodewipeError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for NodewipeError {
    fn from(e: serde_json::Error) -> Self {
        NodewipeError::Json(e.to_string())
    }
}

impl NodewipeError {
    /// Transport-level failures abort the whole removal call; everything
    /// else is a caller or setup mistake.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            NodewipeError::Transport(_) | NodewipeError::Timeout(_)
        )
    }
}
