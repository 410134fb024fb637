//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges)
//! ```
//!
//! # Design Decisions
//! - Logs go to stderr so command output on stdout stays machine-readable
//! - Keys and viewing keys are never logged

pub mod logging;
pub mod metrics;
