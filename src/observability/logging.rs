//! Structured logging.
//!
//! `RUST_LOG` takes precedence; otherwise the configured level applies to
//! this crate and `warn` to everything else. The filter sits behind a
//! reload layer so a binary can start logging before its configuration is
//! loaded and apply the configured level afterwards.

use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry};

/// Level used until configuration says otherwise.
pub const DEFAULT_LEVEL: &str = "info";

fn directives(level: &str) -> String {
    format!("warn,secret_box_client={},secret_box={}", level, level)
}

/// Build the filter used by [`init`].
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| directives(level).into())
}

/// Handle to the installed filter.
pub struct LogHandle(reload::Handle<EnvFilter, Registry>);

impl LogHandle {
    /// Replace the active filter with one for `level`.
    pub fn set_level(&self, level: &str) {
        if let Err(e) = self.0.reload(env_filter(level)) {
            tracing::warn!(error = %e, level, "Failed to change log level");
        }
    }
}

/// Install the global subscriber.
///
/// Returns `None` if a subscriber is already installed; the existing one
/// is left in place.
pub fn init(level: &str) -> Option<LogHandle> {
    let (filter, handle) = reload::Layer::new(env_filter(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .ok()
        .map(|()| LogHandle(handle))
}
