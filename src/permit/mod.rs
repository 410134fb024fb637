//! Query permits: signed, reusable authorizations standing in for a viewing key.

pub mod signer;
pub mod types;

pub use signer::{verify_permit, PermitSigner};
pub use types::{Permission, Permit, PermitError, PermitParams};
