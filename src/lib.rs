//! # Nodewipe
//!
//! Bulk decommissioning of cluster nodes over an unreliable, at-most-once
//! RPC gateway. Every requested node is classified as erased, error, or
//! inaccessible; the error and inaccessible sets are retried a bounded
//! number of times and the outcome is folded into one [`RemovalResult`].
//!
//! The transport is pluggable through [`EraseGateway`]. The companion
//! `nodewipe-rpc` crate provides an HTTP implementation that talks to
//! per-node agents.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use nodewipe::{EraseGateway, NodeRecord, NodesRemover, RemoverConfig, TaskContext};
//!
//! # async fn run<G: EraseGateway>(gateway: G) -> nodewipe::Result<()> {
//! let remover = NodesRemover::new(
//!     TaskContext::new("task-42"),
//!     vec![NodeRecord::new(1), NodeRecord::new(2)],
//!     RemoverConfig::from_env(),
//! );
//!
//! let result = remover.remove(&gateway).await?;
//! println!("{}", serde_json::to_string(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod nodes;
pub mod remover;
pub mod types;

pub use config::RemoverConfig;
pub use error::{NodewipeError, Result};
pub use gateway::EraseGateway;
pub use nodes::NodeCollection;
pub use remover::{remove_nodes, retry_remove_nodes, NodesRemover, RoundOutcome};
pub use types::*;
