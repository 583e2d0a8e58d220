//! Version-check engine
//!
//! This module decides whether a newer release of the host application exists
//! and records the answer where request handlers can cheaply read it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  Scheduler  │────▶│ Coordinator  │────▶│   Source    │
//! │  (cadence)  │     │ (one cycle)  │     │  (fetch)    │
//! └─────────────┘     └──────┬───────┘     └─────────────┘
//!                            │
//!                     ┌──────┴───────┐     ┌─────────────┐
//!                     │  Comparator  │     │Notifications│
//!                     │ (ordering)   │     │ (shared)    │
//!                     └──────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`compare`]: Dotted-numeric version ordering
//! - [`coordinator`]: One check cycle: fetch, compare, publish
//! - [`error`]: Error types for sources and the comparator
//! - [`scheduler`]: Startup check and the recurring background loop
//! - [`source`]: The [`source::VersionSource`] trait
//! - [`sources`]: Concrete sources (public registry, private update server)
//! - [`state`]: Shared notification record read by the presentation layer
//! - [`types`]: `VersionInfo`, `DownloadAsset`, `CheckOutcome`

pub mod compare;
pub mod coordinator;
pub mod error;
pub mod scheduler;
pub mod source;
pub mod sources;
pub mod state;
pub mod types;

use std::sync::Arc;

use crate::check::source::VersionSource;
use crate::check::sources::registry::RegistrySource;
use crate::check::sources::server::ServerSource;
use crate::config::{ConfigError, SourceChannel, UpdateConfig};

/// Builds the version source selected by the operator's channel.
pub fn build_source(config: &UpdateConfig) -> Result<Arc<dyn VersionSource>, ConfigError> {
    match config.source_channel {
        SourceChannel::Registry => Ok(Arc::new(RegistrySource::new(
            &config.project_identifier,
            &config.stable_branch_name,
        ))),
        SourceChannel::PrivateServer => {
            let url = config
                .private_server_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .ok_or(ConfigError::MissingServerUrl)?;
            Ok(Arc::new(ServerSource::new(url)))
        }
    }
}
