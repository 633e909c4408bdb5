use std::sync::Arc;

use clap::Parser;
use solana_agent_chat::agent::SolanaAgentFactory;
use solana_agent_chat::config::Config;
use solana_agent_chat::error::Result;
use solana_agent_chat::gateway;

#[derive(Parser, Debug)]
#[command(name = "solana-agent-chatd")]
#[command(about = "Solana agent chat gateway")]
struct Cli {
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    /// Config JSON; missing files fall back to defaults plus environment.
    #[arg(
        long,
        env = "SOLANA_AGENT_CHAT_CONFIG",
        default_value_t = solana_agent_chat::runtime_paths::default_config_path()
    )]
    config: String,
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Cannot listen for Ctrl-C; running until killed");
        futures::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    solana_agent_chat::logging::init_tracing("solana_agent_chatd");
    let cli = Cli::parse();

    let mut config = Config::load(Some(&cli.config))?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.require_openai_key()?;

    let factory = Arc::new(SolanaAgentFactory::new(config.clone()));
    gateway::run_with_shutdown(&config, factory, shutdown_signal()).await
}
