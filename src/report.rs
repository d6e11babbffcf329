use std::fmt::{self, Write};
use ethers::types::Address;

use crate::tally::SwapSummary;

const NO_SWAP_HINTS: &[&str] = &[
    "you used an aggregator or router that is not listed (add its address to the router table)",
    "the tracker counts from a different time window (set WINDOW_START / WINDOW_END)",
    "the transaction failed, or was only an approve and not a swap",
    "the tracker's minimum amount is higher than what you traded",
];

pub fn render_header(wallet: &Address, chain: &str) -> String {
    format!("[i] Checking swaps for {:?} on {} ...", wallet, capitalize(chain))
}

/// Console summary printed at the end of a run
pub fn render_summary(summary: &SwapSummary) -> String {
    let mut out = String::new();
    // fmt::Write into a String never fails
    write_summary(&mut out, summary).ok();
    out
}

fn write_summary(out: &mut impl Write, summary: &SwapSummary) -> fmt::Result {
    writeln!(out, "=== Summary ===")?;
    writeln!(out, "Total swaps via known routers: {}", summary.total_swaps)?;
    writeln!(out, "Stablecoin-involved swaps:     {}", summary.stable_swaps)?;
    writeln!(out)?;
    writeln!(out, "By protocol:")?;
    for tally in &summary.per_protocol {
        writeln!(
            out,
            "  {:<12} swaps={:<4}  stable_swaps={:<4}",
            tally.protocol, tally.swaps, tally.stable_swaps
        )?;
    }

    if !summary.stable_symbols.is_empty() {
        writeln!(out)?;
        writeln!(out, "By stablecoin:")?;
        for (symbol, count) in &summary.stable_symbols {
            writeln!(out, "  {:<12} swaps={:<4}", symbol, count)?;
        }
    }

    if summary.total_swaps == 0 {
        writeln!(out)?;
        writeln!(out, "[!] No swap matched the router list. Most likely:")?;
        for hint in NO_SWAP_HINTS {
            writeln!(out, "    - {}", hint)?;
        }
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
