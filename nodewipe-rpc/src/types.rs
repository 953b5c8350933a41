use nodewipe::EraseData;
use serde::{Deserialize, Serialize};

/// Body of `POST /agent/erase_node`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EraseNodeRequest {
    pub reboot: bool,
}

/// Agent reply to `erase_node`. The gateway stamps the sender itself from
/// the agent it called.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EraseNodeResponse {
    pub statuscode: i64,
    #[serde(default)]
    pub data: EraseData,
}
