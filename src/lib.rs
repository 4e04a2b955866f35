//! Student advising API client
//!
//! REST client for curated groups and advising notes, plus the filter-criteria
//! codec and menu option loader used by cohort search.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod filters;
pub mod models;
pub mod session;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use api::ApiClient;
pub use auth::{Capability, CapabilityPolicy, UserPrivileges};
pub use config::Config;
pub use errors::{ClientError, Result};
pub use filters::{FilterCriteria, FilterRegistry, Location, OptionLoader};
pub use session::{Session, SessionEvent};

/// Initialize logging; `RUST_LOG` overrides the configured level.
pub fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests;
