use super::types::{EraseNodeRequest, EraseNodeResponse};
use nodewipe::{EraseReply, NodeId};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// HTTP client wrapper for the removal agent running on a single node
pub struct AgentClient {
    uid: NodeId,
    base_url: String,
    http_client: reqwest::Client,
    last_success: Arc<AtomicU64>, // Unix timestamp in seconds
}

impl AgentClient {
    pub fn new(uid: NodeId, base_url: String, http_client: reqwest::Client) -> Self {
        Self {
            uid,
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            last_success: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn uid(&self) -> NodeId {
        self.uid
    }

    pub fn last_success_timestamp(&self) -> u64 {
        self.last_success.load(Ordering::Relaxed)
    }

    /// Ask the agent to erase its node. `Err` means the node did not answer.
    pub async fn erase_node(&self, reboot: bool) -> Result<EraseReply, String> {
        let url = format!("{}/agent/erase_node", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(&EraseNodeRequest { reboot })
            .send()
            .await
            .map_err(|e| format!("Failed to send erase_node to node {}: {}", self.uid, e))?;

        if !response.status().is_success() {
            return Err(format!(
                "Node {} agent returned error: {}",
                self.uid,
                response.status()
            ));
        }

        let resp: EraseNodeResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse erase_node reply from {}: {}", self.uid, e))?;

        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.last_success.store(now, Ordering::Relaxed);

        Ok(EraseReply {
            sender: self.uid,
            statuscode: resp.statuscode,
            data: resp.data,
        })
    }
}
