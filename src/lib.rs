//! Release availability checking for long-running host applications.
//!
//! The engine periodically asks a version source (the public release registry
//! or a private update server) for the latest published release, orders it
//! against the running version, and publishes the result to a shared
//! [`check::state::Notifications`] record that a presentation layer can read
//! on every request without blocking.
//!
//! Typical wiring inside a host:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use upgrade_notify::check::{self, coordinator::CheckCoordinator, scheduler};
//! use upgrade_notify::check::scheduler::Schedule;
//! use upgrade_notify::check::state::Notifications;
//! use upgrade_notify::config::UpdateConfig;
//!
//! # async fn wire(config: UpdateConfig) -> anyhow::Result<()> {
//! config.validate()?;
//!
//! let notifications = Notifications::new(&config.running_version);
//! let coordinator = Arc::new(CheckCoordinator::new(
//!     check::build_source(&config)?,
//!     notifications.clone(),
//!     &config.running_version,
//!     config.force_banner,
//! ));
//!
//! let _task = scheduler::start(Schedule::from_config(&config), coordinator).await;
//!
//! // request handlers read the banner state without blocking on checks
//! let banner = notifications.snapshot();
//! # Ok(())
//! # }
//! ```

pub mod check;
pub mod config;
