//! HTTP removal gateway: fans `erase_node` out to per-node agents.

pub mod agent;
pub mod config;
pub mod gateway;
pub mod types;

pub use agent::AgentClient;
pub use config::{AgentEndpoint, AgentsConfig};
pub use gateway::HttpGateway;
