use crate::config::RemoverConfig;
use crate::error::Result;
use crate::gateway::EraseGateway;
use crate::nodes::NodeCollection;
use crate::types::{EraseReply, NodeId, NodeRecord, RemovalResult, RemovalStatus, TaskContext};
use std::collections::HashSet;
use std::time::Duration;

const NOT_ANSWERED: &str = "Node not answered by RPC.";

/// Outcome of a single classification round. The three collections are
/// pairwise disjoint and together hold exactly the uids of the round input.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RoundOutcome {
    pub erased: NodeCollection,
    pub error: NodeCollection,
    pub inaccessible: NodeCollection,
}

/// Removes a batch of nodes through an [`EraseGateway`], retrying nodes
/// that failed or did not answer.
pub struct NodesRemover {
    ctx: TaskContext,
    nodes: NodeCollection,
    config: RemoverConfig,
}

impl NodesRemover {
    pub fn new<I>(ctx: TaskContext, nodes: I, config: RemoverConfig) -> Self
    where
        I: IntoIterator<Item = NodeRecord>,
    {
        Self {
            ctx,
            nodes: NodeCollection::build(nodes),
            config,
        }
    }

    pub fn nodes(&self) -> &NodeCollection {
        &self.nodes
    }

    /// Runs the first round over every requested node, then reconciles the
    /// error set and the inaccessible set independently, one after the other.
    ///
    /// Only a transport failure of the gateway is returned as `Err`.
    pub async fn remove<G: EraseGateway>(&self, gateway: &G) -> Result<RemovalResult> {
        let task_id = &self.ctx.task_id;
        let retries = self.config.mc_retries;
        let interval = self.config.retry_interval();

        let RoundOutcome {
            mut erased,
            mut error,
            mut inaccessible,
        } = remove_nodes(gateway, &self.ctx, &self.nodes).await?;

        retry_remove_nodes(
            gateway,
            &self.ctx,
            &mut error,
            &mut erased,
            retries,
            interval,
        )
        .await?;
        retry_remove_nodes(
            gateway,
            &self.ctx,
            &mut inaccessible,
            &mut erased,
            retries,
            interval,
        )
        .await?;

        let mut result = RemovalResult {
            nodes: erased.to_records(),
            ..Default::default()
        };

        if !inaccessible.is_empty() {
            let records = inaccessible.to_records();
            tracing::warn!(
                "{}: Removing of nodes {:?} finished with errors. Nodes {:?} are inaccessible",
                task_id,
                self.nodes.uids(),
                records
            );
            result.inaccessible_nodes = Some(records);
        }

        if !error.is_empty() {
            let records = error.to_records();
            tracing::error!(
                "{}: Removing of nodes {:?} finished with errors: {:?}",
                task_id,
                self.nodes.uids(),
                records
            );
            result.status = Some(RemovalStatus::Error);
            result.error_nodes = Some(records);
        }

        tracing::info!(
            "{}: Finished removing of nodes: {:?}",
            task_id,
            self.nodes.uids()
        );

        Ok(result)
    }
}

/// One classification round: a single `erase_node` fan-out over `nodes`,
/// with every requested uid sorted into erased, error or inaccessible.
pub async fn remove_nodes<G: EraseGateway>(
    gateway: &G,
    ctx: &TaskContext,
    nodes: &NodeCollection,
) -> Result<RoundOutcome> {
    if nodes.is_empty() {
        tracing::info!(
            "{}: Nodes to remove are not provided. Do nothing.",
            ctx.task_id
        );
        return Ok(RoundOutcome::default());
    }

    let uids = nodes.sorted_uids();
    tracing::info!("{}: Starting removing of nodes: {:?}", ctx.task_id, uids);

    let replies = gateway.erase(ctx, &uids, true).await?;
    tracing::debug!("{}: Data received from nodes: {:?}", ctx.task_id, replies);

    Ok(classify(ctx, nodes, replies))
}

fn classify(ctx: &TaskContext, nodes: &NodeCollection, replies: Vec<EraseReply>) -> RoundOutcome {
    let mut outcome = RoundOutcome::default();
    let mut answered: HashSet<NodeId> = HashSet::with_capacity(replies.len());

    for reply in replies {
        if !nodes.contains(reply.sender) {
            tracing::warn!(
                "{}: Ignoring reply from node {} which was not asked to erase",
                ctx.task_id,
                reply.sender
            );
            continue;
        }
        if !answered.insert(reply.sender) {
            tracing::warn!(
                "{}: Ignoring duplicate reply from node {}",
                ctx.task_id,
                reply.sender
            );
            continue;
        }

        if reply.statuscode != EraseReply::STATUS_OK {
            let raw = serde_json::to_string(&reply).unwrap_or_else(|_| format!("{:?}", reply));
            outcome.error.insert(NodeRecord::with_error(
                reply.sender,
                format!("RPC agent 'erase_node' failed. Result: {}", raw),
            ));
        } else if !reply.data.rebooted {
            outcome.error.insert(NodeRecord::with_error(
                reply.sender,
                format!(
                    "RPC method 'erase_node' failed with message: {}",
                    reply.data.error_msg.unwrap_or_default()
                ),
            ));
        } else {
            outcome.erased.insert(NodeRecord::new(reply.sender));
        }
    }

    for uid in nodes.uids() {
        if !answered.contains(&uid) {
            outcome
                .inaccessible
                .insert(NodeRecord::with_error(uid, NOT_ANSWERED));
        }
    }

    outcome
}

/// Re-runs classification rounds over `failed` up to `retries` times.
///
/// Nodes erased in a round are moved out of `failed` and into `erased` by
/// uid. Returns as soon as `failed` is empty; whatever is left after the
/// last round stays in `failed` for the caller to report.
pub async fn retry_remove_nodes<G: EraseGateway>(
    gateway: &G,
    ctx: &TaskContext,
    failed: &mut NodeCollection,
    erased: &mut NodeCollection,
    retries: u32,
    interval: Duration,
) -> Result<()> {
    for attempt in 1..=retries {
        let retried = remove_nodes(gateway, ctx, failed).await?.erased;
        for node in retried {
            failed.remove(node.uid);
            erased.insert(node);
        }

        if failed.is_empty() {
            return Ok(());
        }

        tracing::debug!(
            "{}: Retry {}/{} left nodes {:?} not erased",
            ctx.task_id,
            attempt,
            retries,
            failed.uids()
        );

        if !interval.is_zero() {
            tokio::time::sleep(interval).await;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EraseData;

    fn ctx() -> TaskContext {
        TaskContext::new("task-1")
    }

    fn nodes(uids: &[u64]) -> NodeCollection {
        NodeCollection::from_uids(uids.iter().copied().map(NodeId))
    }

    #[test]
    fn test_classify_all_signals() {
        let replies = vec![
            EraseReply::erased(1),
            EraseReply::not_rebooted(2, "disk busy"),
            EraseReply::failed(4, 1),
        ];
        let out = classify(&ctx(), &nodes(&[1, 2, 3, 4]), replies);

        assert_eq!(out.erased.uids(), vec![NodeId(1)]);
        assert_eq!(out.error.sorted_uids(), vec![NodeId(2), NodeId(4)]);
        assert_eq!(out.inaccessible.uids(), vec![NodeId(3)]);

        assert_eq!(
            out.error.get(NodeId(2)).unwrap().error.as_deref(),
            Some("RPC method 'erase_node' failed with message: disk busy")
        );
        let raw = out.error.get(NodeId(4)).unwrap().error.clone().unwrap();
        assert!(raw.starts_with("RPC agent 'erase_node' failed. Result: "));
        assert!(raw.contains("\"statuscode\":1"));
        assert_eq!(
            out.inaccessible.get(NodeId(3)).unwrap().error.as_deref(),
            Some(NOT_ANSWERED)
        );
        assert_eq!(out.erased.get(NodeId(1)).unwrap().error, None);
    }

    #[test]
    fn test_classify_nonzero_status_wins_over_rebooted() {
        let reply = EraseReply {
            sender: NodeId(9),
            statuscode: 5,
            data: EraseData {
                rebooted: true,
                error_msg: None,
            },
        };
        let out = classify(&ctx(), &nodes(&[9]), vec![reply]);
        assert!(out.erased.is_empty());
        assert!(out.error.contains(NodeId(9)));
    }

    #[test]
    fn test_classify_ignores_unrequested_and_duplicate_replies() {
        let replies = vec![
            EraseReply::failed(1, 2),
            EraseReply::erased(1),
            EraseReply::erased(77),
        ];
        let out = classify(&ctx(), &nodes(&[1]), replies);
        assert!(out.erased.is_empty());
        assert_eq!(out.error.uids(), vec![NodeId(1)]);
        assert!(out.inaccessible.is_empty());
    }

    #[test]
    fn test_not_rebooted_without_message() {
        let reply = EraseReply {
            sender: NodeId(1),
            statuscode: 0,
            data: EraseData::default(),
        };
        let out = classify(&ctx(), &nodes(&[1]), vec![reply]);
        assert_eq!(
            out.error.get(NodeId(1)).unwrap().error.as_deref(),
            Some("RPC method 'erase_node' failed with message: ")
        );
    }
}
