//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → .env + process environment (overlay, env wins)
//!     → validation.rs (presence checks)
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow env-only setups
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AccountConfig;
pub use schema::AppConfig;
pub use schema::ContractConfig;
pub use schema::NetworkConfig;
