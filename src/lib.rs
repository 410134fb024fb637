//! Client library for the SecretBox contract on Secret Network.

pub mod blockchain;
pub mod config;
pub mod contract;
pub mod observability;
pub mod permit;

pub use blockchain::{ComputeClient, SigningProxyClient, Wallet};
pub use config::AppConfig;
pub use contract::SecretBox;
