pub mod config;
pub mod explorer;
pub mod logging;
pub mod registry;
pub mod report;
pub mod swap_counter;
pub mod tally;
