//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment Variables (mnemonic or private key, node and proxy URLs)
//!     → wallet.rs (key loading, address derivation, amino signing)
//!     → client.rs (ComputeClient seam)
//!     → proxy.rs (ComputeClient over a signing proxy, with timeouts)
//! ```
//!
//! # Security Constraints
//! - Mnemonics and private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All proxy calls have configurable timeouts

pub mod client;
pub mod proxy;
pub mod types;
pub mod wallet;

pub use client::ComputeClient;
pub use proxy::SigningProxyClient;
pub use types::{BlockchainError, BlockchainResult, ChainId, ExecuteRequest, QueryRequest, TxResponse};
pub use wallet::Wallet;
