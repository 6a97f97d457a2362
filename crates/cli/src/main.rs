//! # knife-dns
//!
//! Loopback DNS resolver for inventory roles.

use clap::Parser;
use knife_dns::bootstrap::{init_logging, load_config};
use knife_dns::ResolverServer;
use knife_dns_domain::{ConfigSource, LoggingConfig};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "knife-dns")]
#[command(version)]
#[command(about = "Resolve <role>[-n].<domain>.<zone> to inventory node addresses")]
struct Cli {
    /// UDP port to listen on (loopback only)
    #[arg(short = 'p', long, default_value_t = 53)]
    port: u16,

    /// Domains file (YAML, or TOML with a .toml extension)
    #[arg(short = 'c', long)]
    config: PathBuf,

    /// Reload when the domains file or a credential file changes
    #[arg(short = 'w', long)]
    watch: bool,

    /// Zone every resolvable name ends with
    #[arg(long, default_value = "chef")]
    base_zone: String,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&LoggingConfig::with_level(&cli.log_level));

    let source = ConfigSource::File(cli.config);
    let config = load_config(cli.port, &cli.base_zone, cli.watch, &source)?;

    let mut server = ResolverServer::new(config, source)?;
    let addr = server.start().await?;
    info!(addr = %addr, "Server ready! Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    server.stop().await;

    Ok(())
}
