use crate::error::Result;
use crate::types::{EraseReply, NodeId, TaskContext};
use std::future::Future;
use std::sync::Arc;

/// Fans an `erase_node` command out to a set of nodes and collects the
/// replies of the nodes that answered.
///
/// Implementations must not fail because an individual node failed: a node
/// reporting an error comes back as a reply with a non-zero `statuscode` or
/// `rebooted == false`, and a node that never answered is simply absent from
/// the returned list. An `Err` means the call as a whole could not be made.
pub trait EraseGateway {
    fn erase(
        &self,
        ctx: &TaskContext,
        uids: &[NodeId],
        reboot: bool,
    ) -> impl Future<Output = Result<Vec<EraseReply>>> + Send;
}

impl<G: EraseGateway> EraseGateway for Arc<G> {
    fn erase(
        &self,
        ctx: &TaskContext,
        uids: &[NodeId],
        reboot: bool,
    ) -> impl Future<Output = Result<Vec<EraseReply>>> + Send {
        (**self).erase(ctx, uids, reboot)
    }
}

impl<G: EraseGateway> EraseGateway for &G {
    fn erase(
        &self,
        ctx: &TaskContext,
        uids: &[NodeId],
        reboot: bool,
    ) -> impl Future<Output = Result<Vec<EraseReply>>> + Send {
        (**self).erase(ctx, uids, reboot)
    }
}
