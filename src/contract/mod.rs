//! SecretBox contract surface.
//!
//! # Data Flow
//! ```text
//! caller intent (submit, set key, query, permit query)
//!     → facade.rs (build ExecuteMsg / QueryMsg)
//!     → ComputeClient (encrypt, sign, broadcast or query)
//!     → msg.rs (decode answer into QueryResult)
//!     → caller branches on Answer / Error
//! ```

pub mod facade;
pub mod msg;

pub use facade::SecretBox;
pub use msg::{
    AllInfoResponse, AllInfoResult, AmIRichestResponse, AmIRichestResult, ExecuteMsg, QueryMsg,
    QueryResult, QueryWithPermit,
};
