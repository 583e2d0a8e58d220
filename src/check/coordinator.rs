//! One check cycle: fetch, compare, publish

use std::cmp::Ordering;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::check::compare::compare_versions;
use crate::check::error::SourceError;
use crate::check::source::VersionSource;
use crate::check::state::Notifications;
use crate::check::types::{CODE_BAD_DATA, CODE_TRANSPORT, CODE_UP_TO_DATE, CheckOutcome, VersionInfo};

/// Prefix tolerated on release tags when comparing against the running
/// version ("v1.2.3" vs "1.2.3").
const TAG_PREFIX: &str = "v";

/// Drives one check cycle against the configured source.
///
/// `run_check` never panics and never returns an error: every failure mode is
/// folded into the returned [`CheckOutcome`], so the scheduler loop and any
/// manual trigger only ever see a typed result.
pub struct CheckCoordinator {
    source: Arc<dyn VersionSource>,
    notifications: Notifications,
    running_version: String,
    force_banner: bool,
    // Serializes concurrent callers so a manual trigger cannot interleave
    // with the scheduled loop.
    flight: Mutex<()>,
}

impl CheckCoordinator {
    pub fn new(
        source: Arc<dyn VersionSource>,
        notifications: Notifications,
        running_version: &str,
        force_banner: bool,
    ) -> Self {
        Self {
            source,
            notifications,
            running_version: running_version.to_string(),
            force_banner,
            flight: Mutex::new(()),
        }
    }

    /// Runs one check cycle and returns its outcome.
    ///
    /// The shared notification state is only touched when the fetched version
    /// is strictly newer than the running one AND the operator enabled the
    /// banner; the outcome is returned to the caller either way.
    pub async fn run_check(&self) -> CheckOutcome {
        let _flight = self.flight.lock().await;

        let outcome = self.check_once().await;

        info!(
            channel = self.source.channel(),
            current_version = %self.running_version,
            new_version = %outcome.data.new_version,
            code = outcome.code,
            status = ?outcome.status(),
            "version check completed"
        );

        outcome
    }

    async fn check_once(&self) -> CheckOutcome {
        let fetched = match self.source.fetch().await {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    channel = self.source.channel(),
                    error = %err,
                    "version check fetch failed"
                );
                return failure_outcome(&err);
            }
        };

        // A source-reported failure (private-server document with
        // success=false) is returned unchanged.
        if !fetched.success {
            return fetched;
        }

        let info = fetched.data;
        if info.new_version.is_empty() {
            return CheckOutcome::ok("no qualifying release found", VersionInfo::default());
        }

        let ordering =
            match compare_versions(&self.running_version, &info.new_version, TAG_PREFIX) {
                Ok(ordering) => ordering,
                Err(err) => {
                    warn!(
                        channel = self.source.channel(),
                        fetched_version = %info.new_version,
                        error = %err,
                        "cannot order fetched version against running version"
                    );
                    return CheckOutcome::failure(
                        CODE_BAD_DATA,
                        "fetched version identifier is malformed",
                    );
                }
            };

        if ordering != Ordering::Less {
            return CheckOutcome::failure(CODE_UP_TO_DATE, "already running the latest version");
        }

        if self.force_banner {
            self.notifications.publish(&info);
        }

        CheckOutcome::ok("new version available", info)
    }
}

fn failure_outcome(err: &SourceError) -> CheckOutcome {
    match err {
        SourceError::Network(_) | SourceError::Status(_) => {
            CheckOutcome::failure(CODE_TRANSPORT, "version source unreachable")
        }
        SourceError::MalformedResponse(_) => {
            CheckOutcome::failure(CODE_BAD_DATA, "version source returned unusable data")
        }
    }
}
