use eyre::{Result, WrapErr};
use tracing::{info, instrument};

use crate::config::Config;
use crate::explorer::ExplorerClient;
use crate::registry::ProtocolRegistry;
use crate::tally::{SwapSummary, tally_swaps};

/// Fetches a wallet's history and classifies its swaps.
pub struct SwapCounter {
    explorer_client: ExplorerClient,
    registry: ProtocolRegistry,
    config: Config,
}

impl SwapCounter {
    pub fn new(config: Config, registry: ProtocolRegistry) -> Result<Self> {
        let explorer_client = ExplorerClient::new(&config).wrap_err("Failed to build explorer client")?;
        Ok(Self {
            explorer_client,
            registry,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Two sequential explorer calls, then an in-memory tally
    #[instrument(skip(self), fields(wallet = ?self.config.wallet_address))]
    pub async fn run(&self) -> Result<SwapSummary> {
        let wallet = self.config.wallet_address;
        let (start_block, end_block) = (self.config.start_block, self.config.end_block);

        let normal = self
            .explorer_client
            .get_normal_txs(wallet, start_block, end_block)
            .await
            .wrap_err("Failed to fetch normal transactions")?;
        let transfers = self
            .explorer_client
            .get_erc20_transfers(wallet, start_block, end_block)
            .await
            .wrap_err("Failed to fetch ERC-20 transfers")?;

        let summary = tally_swaps(&self.registry, &normal, &transfers, &self.config.window);
        info!(
            total_swaps = summary.total_swaps,
            stable_swaps = summary.stable_swaps,
            "Swap tally complete"
        );
        Ok(summary)
    }
}
