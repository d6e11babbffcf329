use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use chrono::{DateTime, NaiveDate, Utc};
use ethers::types::Address;
use eyre::{Result, WrapErr, eyre};

pub const DEFAULT_EXPLORER_API_URL: &str = "https://api.basescan.org/api";
pub const DEFAULT_CHAIN_NAME: &str = "base";
pub const DEFAULT_START_BLOCK: u64 = 0;
pub const DEFAULT_END_BLOCK: u64 = 99_999_999;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

/// Optional inclusive time window, in unix seconds. An unset bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_ts: Option<u64>,
    pub end_ts: Option<u64>,
}

impl TimeWindow {
    pub fn new(start_ts: Option<u64>, end_ts: Option<u64>) -> Self {
        Self { start_ts, end_ts }
    }

    pub fn contains(&self, ts: u64) -> bool {
        if let Some(start) = self.start_ts {
            if ts < start {
                return false;
            }
        }
        if let Some(end) = self.end_ts {
            if ts > end {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub explorer_api_key: String,
    pub explorer_api_url: String,
    pub wallet_address: Address,
    pub chain_name: String,
    pub start_block: u64,
    pub end_block: u64,
    pub window: TimeWindow,
    pub request_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any name -> value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let explorer_api_key = lookup("BASESCAN_API_KEY")
            .ok_or_else(|| eyre!("Missing BASESCAN_API_KEY"))?;
        let wallet_raw = lookup("WALLET_ADDRESS")
            .ok_or_else(|| eyre!("Missing WALLET_ADDRESS"))?;
        let wallet_address = Address::from_str(wallet_raw.trim())
            .wrap_err_with(|| format!("Invalid WALLET_ADDRESS: {}", wallet_raw))?;

        let explorer_api_url = lookup("EXPLORER_API_URL")
            .unwrap_or_else(|| DEFAULT_EXPLORER_API_URL.to_string());
        let chain_name = lookup("CHAIN_NAME").unwrap_or_else(|| DEFAULT_CHAIN_NAME.to_string());

        let start_block = parse_u64_var(&lookup, "START_BLOCK", DEFAULT_START_BLOCK)?;
        let end_block = parse_u64_var(&lookup, "END_BLOCK", DEFAULT_END_BLOCK)?;
        if start_block > end_block {
            eyre::bail!("START_BLOCK ({}) is after END_BLOCK ({})", start_block, end_block);
        }

        let window = TimeWindow::new(
            parse_window_var(&lookup, "WINDOW_START")?,
            parse_window_var(&lookup, "WINDOW_END")?,
        );
        if let (Some(start), Some(end)) = (window.start_ts, window.end_ts) {
            if start > end {
                eyre::bail!("WINDOW_START is after WINDOW_END");
            }
        }

        let timeout_secs = parse_u64_var(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            eyre::bail!("REQUEST_TIMEOUT_SECS must be greater than 0");
        }

        Ok(Config {
            explorer_api_key,
            explorer_api_url,
            wallet_address,
            chain_name,
            start_block,
            end_block,
            window,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_u64_var(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u64) -> Result<u64> {
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .wrap_err_with(|| format!("Invalid {}: {}", name, raw)),
        None => Ok(default),
    }
}

fn parse_window_var(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<u64>> {
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => parse_timestamp(&raw)
            .map(Some)
            .wrap_err_with(|| format!("Invalid {}: {}", name, raw)),
        _ => Ok(None),
    }
}

/// Accepts RFC 3339 (`2025-09-01T12:00:00Z`) or a bare date (`2025-09-01`, UTC midnight).
pub fn parse_timestamp(raw: &str) -> Result<u64> {
    let raw = raw.trim();
    let dt = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        dt.with_timezone(&Utc)
    } else {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")?;
        date.and_hms_opt(0, 0, 0)
            .ok_or_else(|| eyre!("Invalid date: {}", raw))?
            .and_utc()
    };
    u64::try_from(dt.timestamp()).map_err(|_| eyre!("Timestamp before unix epoch: {}", raw))
}
