use nodewipe::NodeId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Directory of node agents the gateway can reach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentsConfig {
    #[serde(default)]
    pub agents: Vec<AgentEndpoint>,
    /// Wait window for one fan-out, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentEndpoint {
    pub uid: NodeId,
    pub addr: String, // e.g., "http://10.20.0.5:8181"
}

fn default_timeout_ms() -> u64 {
    std::env::var("NODEWIPE_RPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TIMEOUT_MS)
}

impl Default for AgentsConfig {
    fn default() -> Self {
        AgentsConfig {
            agents: vec![],
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AgentsConfig {
    /// Load the agent directory from {config_dir}/agents.json or return an
    /// empty one, in which case no node will answer.
    pub fn load_or_default(config_dir: &Path) -> Self {
        let agents_json = config_dir.join("agents.json");

        if agents_json.exists() {
            match std::fs::read_to_string(&agents_json) {
                Ok(content) => match serde_json::from_str::<AgentsConfig>(&content) {
                    Ok(config) => {
                        tracing::info!(
                            "Loaded agents config: agents={}, timeout_ms={}",
                            config.agents.len(),
                            config.timeout_ms
                        );
                        return config;
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse agents.json: {}, using defaults", e);
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to read agents.json: {}, using defaults", e);
                }
            }
        }

        tracing::warn!(
            "No usable agents.json in {}, every node will be reported as not answering",
            config_dir.display()
        );

        AgentsConfig::default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
