use clap::Parser;
use nodewipe::{NodeRecord, NodesRemover, NodewipeError, RemoverConfig, TaskContext};
use nodewipe_rpc::{AgentsConfig, HttpGateway};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nodewipe", about = "Erase and reboot a batch of cluster nodes")]
struct Cli {
    /// JSON array of node records ("-" reads stdin)
    #[arg(long, default_value = "-")]
    nodes: String,

    /// Correlation id used in log lines (random when omitted)
    #[arg(long, env = "NODEWIPE_TASK_ID")]
    task_id: Option<String>,

    /// Directory holding agents.json
    #[arg(long, env = "NODEWIPE_CONFIG_DIR", default_value = ".")]
    config_dir: PathBuf,

    #[arg(long, env = "NODEWIPE_MC_RETRIES")]
    retries: Option<u32>,

    #[arg(long, env = "NODEWIPE_MC_RETRY_INTERVAL_MS")]
    retry_interval_ms: Option<u64>,
}

fn read_nodes(source: &str) -> Result<Vec<NodeRecord>, NodewipeError> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(source)?
    };

    serde_json::from_str(&content).map_err(|e| NodewipeError::InvalidNodeList(e.to_string()))
}

fn remover_config(cli: &Cli) -> RemoverConfig {
    let defaults = RemoverConfig::from_env();
    RemoverConfig::new(
        cli.retries.unwrap_or(defaults.mc_retries),
        cli.retry_interval_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| defaults.retry_interval()),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let nodes = read_nodes(&cli.nodes)?;
    let config = remover_config(&cli);
    let task_id = cli
        .task_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    tracing::info!(
        task_id = %task_id,
        nodes = nodes.len(),
        mc_retries = config.mc_retries,
        mc_retry_interval_ms = config.mc_retry_interval_ms,
        "Removal requested"
    );

    let gateway = HttpGateway::new(AgentsConfig::load_or_default(&cli.config_dir));
    let remover = NodesRemover::new(TaskContext::new(task_id), nodes, config);
    let result = remover.remove(&gateway).await?;

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
