use tracing::{info, error};

use wallet_swap_counter::logging;
use wallet_swap_counter::config;
use wallet_swap_counter::registry::ProtocolRegistry;
use wallet_swap_counter::report;
use wallet_swap_counter::swap_counter::SwapCounter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load environment variables from .env file, if present
    dotenvy::dotenv().ok();

    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME")) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    // Load configuration
    let cfg = config::Config::load()?;
    info!(
        chain = %cfg.chain_name,
        explorer = %cfg.explorer_api_url,
        start_block = cfg.start_block,
        end_block = cfg.end_block,
        "Configuration loaded and logging initialized"
    );

    let registry = ProtocolRegistry::base()?;
    info!(protocols = registry.protocols().count(), routers = registry.num_routers(), "Protocol registry loaded");

    println!("{}", report::render_header(&cfg.wallet_address, &cfg.chain_name));

    let counter = SwapCounter::new(cfg, registry)?;
    let summary = match counter.run().await {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Failed to count swaps");
            return Err(e);
        }
    };

    print!("{}", report::render_summary(&summary));

    Ok(())
}
