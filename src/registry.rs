use std::collections::HashMap;
use std::str::FromStr;
use ethers::types::Address;
use eyre::{Result, WrapErr};
use tracing::{debug, instrument};

/// Router and aggregator contracts on Base, grouped by protocol.
/// Order matters: it is the output order, and a later protocol takes over an address listed earlier.
pub const BASE_ROUTERS: &[(&str, &[&str])] = &[
    ("uniswap", &[
        "0x6ff5693b99212da76ad316178a184ab56d299b43", // UniversalRouter
        "0x2626664c2603336e57b271c5c0b26f421741e481", // SwapRouter02
    ]),
    ("sushi", &[
        "0x6bded42c6da8fbf0d2ba55b2fa120c5e0c8d7891", // V2 Router
    ]),
    ("pancake", &[
        "0x678aa4bf4e210cf2166753e054d5b7c31cc7fa86", // Smart Router (v3)
        "0xfe6508f0015c778bdcc1fb5465ba5ebe224c9912", // Universal Router
    ]),
    ("aerodrome", &[
        "0xbe6d8f0d05cc4be24d5167a3ef062215be6d18a5", // Slipstream Swap Router
        "0x6cb442acf35158d5eda88fe602221b67b400be3e", // Universal Router
        "0xcf77a3ba9a5ca399b7c97c74d54e5b1beb874e43", // Legacy Router
    ]),
    ("aave", &[
        "0xa238dd80c259a72e81d7e4664a9801593f98d1c5", // Pool proxy, not a swap router
    ]),
    ("stargate", &[
        "0x45f1a95a4d3f3836523f5c83673c797f4d4d263b", // Router
        "0x50b6ebc2103bfec165949cc946d739d5650d7ae4", // RouterETH
        "0xaf54be5b6eec24d6bfacf1cce4eaf680a8239398", // Bridge
    ]),
    ("metamask", &[
        "0xdef1c0ded9bec7f1a1670819833240f027b25eff", // 0x Exchange Proxy
    ]),
    ("matcha", &[
        "0xdef1c0ded9bec7f1a1670819833240f027b25eff", // 0x Exchange Proxy
    ]),
    ("limitless", &[]),
];

/// Known stablecoin contracts on Base.
pub const BASE_STABLES: &[(&str, &str)] = &[
    ("0x833589fcd6edb6e08f4c7c32d4f71b54bda02913", "USDC"),  // native
    ("0xd9aaec86b65d86f6a7b5b1b0c42ffa7505e8fe86", "USDbC"), // bridged
];

/// Lookup tables for router ownership and stablecoin symbols.
/// Addresses are held as `Address`, so matching ignores hex case.
#[derive(Debug, Clone)]
pub struct ProtocolRegistry {
    protocols: Vec<String>,
    router_to_protocol: HashMap<Address, String>,
    stables: HashMap<Address, String>,
}

impl ProtocolRegistry {
    /// Registry for Base mainnet
    pub fn base() -> Result<Self> {
        Self::from_tables(BASE_ROUTERS, BASE_STABLES)
    }

    #[instrument(skip_all)]
    pub fn from_tables(routers: &[(&str, &[&str])], stables: &[(&str, &str)]) -> Result<Self> {
        let mut protocols = Vec::with_capacity(routers.len());
        let mut router_to_protocol = HashMap::new();
        for (protocol, addresses) in routers {
            if !protocols.iter().any(|p: &String| p == protocol) {
                protocols.push(protocol.to_string());
            }
            for raw in addresses.iter() {
                let address = Address::from_str(raw)
                    .wrap_err_with(|| format!("Invalid router address for {}: {}", protocol, raw))?;
                if let Some(previous) = router_to_protocol.insert(address, protocol.to_string()) {
                    debug!(%address, previous = %previous, protocol = %protocol, "Router listed twice, later protocol wins");
                }
            }
        }

        let mut stable_map = HashMap::new();
        for (raw, symbol) in stables {
            let address = Address::from_str(raw)
                .wrap_err_with(|| format!("Invalid stablecoin address for {}: {}", symbol, raw))?;
            stable_map.insert(address, symbol.to_string());
        }

        debug!(
            protocols = protocols.len(),
            routers = router_to_protocol.len(),
            stables = stable_map.len(),
            "Protocol registry built"
        );
        Ok(Self {
            protocols,
            router_to_protocol,
            stables: stable_map,
        })
    }

    /// Protocol names in declaration order
    pub fn protocols(&self) -> impl Iterator<Item = &str> + '_ {
        self.protocols.iter().map(String::as_str)
    }

    pub fn num_routers(&self) -> usize {
        self.router_to_protocol.len()
    }

    pub fn is_router(&self, address: &Address) -> bool {
        self.router_to_protocol.contains_key(address)
    }

    pub fn protocol_for(&self, router: &Address) -> Option<&str> {
        self.router_to_protocol.get(router).map(String::as_str)
    }

    pub fn is_stable(&self, token: &Address) -> bool {
        self.stables.contains_key(token)
    }

    pub fn stable_symbol(&self, token: &Address) -> Option<&str> {
        self.stables.get(token).map(String::as_str)
    }
}
