pub mod explorer_client;
pub mod explorer_types;

pub use explorer_client::{ExplorerClient, ExplorerError};
pub use explorer_types::{NormalTx, TokenTransfer};
