use super::agent::AgentClient;
use super::config::AgentsConfig;
use nodewipe::{EraseGateway, EraseReply, NodeId, NodewipeError, Result, TaskContext};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Removal gateway that calls each node's agent over HTTP, concurrently,
/// and returns whatever replies arrive within the wait window.
pub struct HttpGateway {
    agents: HashMap<NodeId, Arc<AgentClient>>,
    timeout: Duration,
}

impl HttpGateway {
    pub fn new(config: AgentsConfig) -> Self {
        let timeout = config.timeout();
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let agents = config
            .agents
            .into_iter()
            .map(|endpoint| {
                (
                    endpoint.uid,
                    Arc::new(AgentClient::new(
                        endpoint.uid,
                        endpoint.addr,
                        http_client.clone(),
                    )),
                )
            })
            .collect();

        Self { agents, timeout }
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn agent(&self, uid: NodeId) -> Option<&Arc<AgentClient>> {
        self.agents.get(&uid)
    }
}

impl EraseGateway for HttpGateway {
    async fn erase(
        &self,
        ctx: &TaskContext,
        uids: &[NodeId],
        reboot: bool,
    ) -> Result<Vec<EraseReply>> {
        let deadline = tokio::time::Instant::now() + self.timeout;
        let mut join_set = JoinSet::new();

        for uid in uids {
            let Some(agent) = self.agents.get(uid) else {
                tracing::warn!("{}: No agent known for node {}", ctx.task_id, uid);
                continue;
            };
            let agent = Arc::clone(agent);
            join_set.spawn(async move { agent.erase_node(reboot).await });
        }

        let mut replies = Vec::with_capacity(join_set.len());
        loop {
            match tokio::time::timeout_at(deadline, join_set.join_next()).await {
                Ok(Some(Ok(Ok(reply)))) => replies.push(reply),
                Ok(Some(Ok(Err(e)))) => {
                    tracing::warn!("{}: {}", ctx.task_id, e);
                }
                Ok(Some(Err(e))) => {
                    return Err(NodewipeError::Transport(format!(
                        "erase_node task join error: {}",
                        e
                    )));
                }
                Ok(None) => break,
                Err(_) => {
                    tracing::warn!(
                        "{}: erase_node wait window of {:?} elapsed with {} agents pending",
                        ctx.task_id,
                        self.timeout,
                        join_set.len()
                    );
                    join_set.abort_all();
                    break;
                }
            }
        }

        replies.sort_by_key(|reply| reply.sender);
        Ok(replies)
    }
}
