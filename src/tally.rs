use std::collections::{BTreeMap, HashMap};
use ethers::types::{Address, U256};
use tracing::{debug, instrument, warn};

use crate::config::TimeWindow;
use crate::explorer::{NormalTx, TokenTransfer};
use crate::registry::ProtocolRegistry;

/// A normal transaction that was sent to a known router
#[derive(Debug, Clone)]
struct RouterTx<'a> {
    router: Address,
    timestamp: u64,
    value: U256,
    succeeded: bool,
    hash: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolTally {
    pub protocol: String,
    pub swaps: usize,
    pub stable_swaps: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapSummary {
    pub total_swaps: usize,
    pub stable_swaps: usize,
    pub per_protocol: Vec<ProtocolTally>, // registry declaration order, zeros included
    pub stable_symbols: BTreeMap<String, usize>, // swaps touching each stablecoin
}

impl SwapSummary {
    pub fn protocol(&self, name: &str) -> Option<&ProtocolTally> {
        self.per_protocol.iter().find(|t| t.protocol == name)
    }
}

/// Counts swaps through known routers and how many of them moved a stablecoin.
///
/// A router transaction counts as a swap only if it succeeded and at least one ERC-20
/// transfer shares its hash. Both lists are filtered by `window` independently.
#[instrument(skip_all, fields(normal = normal.len(), transfers = transfers.len()))]
pub fn tally_swaps(
    registry: &ProtocolRegistry,
    normal: &[NormalTx],
    transfers: &[TokenTransfer],
    window: &TimeWindow,
) -> SwapSummary {
    // Hash is the join key between the two lists; the API returns it lowercase
    // but nothing guarantees that, so normalise here.
    let mut router_txs: HashMap<String, RouterTx> = HashMap::new();
    for tx in normal {
        let Some(router) = tx.to_address() else { continue };
        if !registry.is_router(&router) {
            continue;
        }
        let Some(timestamp) = tx.timestamp() else {
            warn!(hash = %tx.hash, time_stamp = %tx.time_stamp, "Skipping transaction with unparsable timestamp");
            continue;
        };
        if !window.contains(timestamp) {
            continue;
        }
        router_txs.insert(
            tx.hash.to_lowercase(),
            RouterTx {
                router,
                timestamp,
                value: tx.value_wei(),
                succeeded: tx.succeeded(),
                hash: &tx.hash,
            },
        );
    }

    let mut transfers_by_tx: HashMap<String, Vec<&TokenTransfer>> = HashMap::new();
    for transfer in transfers {
        let Some(timestamp) = transfer.timestamp() else {
            warn!(hash = %transfer.hash, "Skipping transfer with unparsable timestamp");
            continue;
        };
        if !window.contains(timestamp) {
            continue;
        }
        transfers_by_tx
            .entry(transfer.hash.to_lowercase())
            .or_default()
            .push(transfer);
    }

    let mut per_protocol: Vec<ProtocolTally> = registry
        .protocols()
        .map(|p| ProtocolTally { protocol: p.to_string(), swaps: 0, stable_swaps: 0 })
        .collect();
    let mut summary = SwapSummary::default();

    for (key, meta) in &router_txs {
        if !meta.succeeded {
            debug!(hash = %meta.hash, "Router transaction failed, not a swap");
            continue;
        }
        let Some(tx_transfers) = transfers_by_tx.get(key) else {
            debug!(hash = %meta.hash, "No token transfers, likely an approve");
            continue;
        };

        summary.total_swaps += 1;
        let protocol = registry.protocol_for(&meta.router);
        let slot = protocol.and_then(|p| per_protocol.iter_mut().find(|t| t.protocol == p));

        let mut symbols: Vec<&str> = tx_transfers
            .iter()
            .filter_map(|t| t.token_address())
            .filter_map(|token| registry.stable_symbol(&token))
            .collect();
        symbols.sort_unstable();
        symbols.dedup();
        let is_stable = !symbols.is_empty();

        debug!(
            hash = %meta.hash,
            protocol = protocol.unwrap_or("unknown"),
            timestamp = meta.timestamp,
            value_wei = %meta.value,
            transfers = tx_transfers.len(),
            is_stable,
            "Swap classified"
        );

        if let Some(slot) = slot {
            slot.swaps += 1;
            if is_stable {
                slot.stable_swaps += 1;
            }
        }
        if is_stable {
            summary.stable_swaps += 1;
            for symbol in symbols {
                *summary.stable_symbols.entry(symbol.to_string()).or_insert(0) += 1;
            }
        }
    }

    summary.per_protocol = per_protocol;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTER: &str = "0x2626664c2603336e57b271c5c0b26f421741e481";
    const USDC: &str = "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913";
    const WETH: &str = "0x4200000000000000000000000000000000000006";

    fn tx(hash: &str, to: &str, ts: u64, is_error: &str) -> NormalTx {
        NormalTx {
            hash: hash.to_string(),
            block_number: "1".to_string(),
            time_stamp: ts.to_string(),
            from: String::new(),
            to: Some(to.to_string()),
            value: "0".to_string(),
            is_error: is_error.to_string(),
        }
    }

    fn transfer(hash: &str, token: &str, ts: u64) -> TokenTransfer {
        TokenTransfer {
            hash: hash.to_string(),
            block_number: "1".to_string(),
            time_stamp: ts.to_string(),
            from: String::new(),
            to: String::new(),
            value: "1".to_string(),
            contract_address: Some(token.to_string()),
            token_symbol: String::new(),
            token_decimal: "18".to_string(),
        }
    }

    #[test]
    fn test_empty_inputs_yield_zero_rows_for_every_protocol() {
        let registry = ProtocolRegistry::base().unwrap();
        let summary = tally_swaps(&registry, &[], &[], &TimeWindow::default());
        assert_eq!(summary.total_swaps, 0);
        assert_eq!(summary.stable_swaps, 0);
        assert_eq!(summary.per_protocol.len(), 9);
        assert!(summary.per_protocol.iter().all(|t| t.swaps == 0 && t.stable_swaps == 0));
    }

    #[test]
    fn test_stable_swap_counted_once_with_multiple_transfers() {
        let registry = ProtocolRegistry::base().unwrap();
        let normal = vec![tx("0xa", ROUTER, 100, "0")];
        let transfers = vec![
            transfer("0xa", USDC, 100),
            transfer("0xa", USDC, 100),
            transfer("0xa", WETH, 100),
        ];
        let summary = tally_swaps(&registry, &normal, &transfers, &TimeWindow::default());
        assert_eq!(summary.total_swaps, 1);
        assert_eq!(summary.stable_swaps, 1);
        assert_eq!(summary.stable_symbols.get("USDC"), Some(&1));
        let uniswap = summary.protocol("uniswap").unwrap();
        assert_eq!((uniswap.swaps, uniswap.stable_swaps), (1, 1));
    }

    #[test]
    fn test_hash_join_ignores_case() {
        let registry = ProtocolRegistry::base().unwrap();
        let normal = vec![tx("0xABCDEF", ROUTER, 100, "0")];
        let transfers = vec![transfer("0xabcdef", WETH, 100)];
        let summary = tally_swaps(&registry, &normal, &transfers, &TimeWindow::default());
        assert_eq!(summary.total_swaps, 1);
        assert_eq!(summary.stable_swaps, 0);
    }

    #[test]
    fn test_missing_destination_is_skipped() {
        let registry = ProtocolRegistry::base().unwrap();
        let mut creation = tx("0xc", ROUTER, 100, "0");
        creation.to = None;
        let mut blank = tx("0xd", ROUTER, 100, "0");
        blank.to = Some(String::new());
        let transfers = vec![transfer("0xc", USDC, 100), transfer("0xd", USDC, 100)];
        let summary = tally_swaps(&registry, &[creation, blank], &transfers, &TimeWindow::default());
        assert_eq!(summary.total_swaps, 0);
    }

    #[test]
    fn test_missing_or_nonzero_is_error_is_not_a_swap() {
        let registry = ProtocolRegistry::base().unwrap();
        let decoded: NormalTx = serde_json::from_value(serde_json::json!({
            "hash": "0xe",
            "timeStamp": "100",
            "to": ROUTER
        }))
        .unwrap();
        assert_eq!(decoded.is_error, "");
        let normal = vec![decoded, tx("0xf", ROUTER, 100, "1")];
        let transfers = vec![transfer("0xe", USDC, 100), transfer("0xf", USDC, 100)];
        let summary = tally_swaps(&registry, &normal, &transfers, &TimeWindow::default());
        assert_eq!(summary.total_swaps, 0);
        assert_eq!(summary.stable_swaps, 0);
    }
}
