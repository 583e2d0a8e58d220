//! Shared notification record read by the presentation layer

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::check::types::{DownloadAsset, VersionInfo};

/// What the presentation layer needs to render an upgrade banner.
///
/// `current_version` is fixed at process start; the remaining fields change
/// only when the coordinator publishes a detected update.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationState {
    pub has_new_version: bool,
    pub is_important: bool,
    pub current_version: String,
    pub new_version: String,
    pub description: String,
    pub download_assets: Vec<DownloadAsset>,
}

/// Handle to the process-wide notification record.
///
/// Exactly one writer (the coordinator) mutates the record, always inside a
/// single critical section, so readers never observe a half-updated banner.
/// Readers take whole-record snapshots and never block each other.
#[derive(Clone)]
pub struct Notifications {
    inner: Arc<RwLock<NotificationState>>,
}

impl Notifications {
    pub fn new(current_version: &str) -> Self {
        Self {
            inner: Arc::new(RwLock::new(NotificationState {
                current_version: current_version.to_string(),
                ..NotificationState::default()
            })),
        }
    }

    /// Whole-record copy for request handlers.
    pub fn snapshot(&self) -> NotificationState {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces all mutable fields in one critical section.
    pub(crate) fn publish(&self, info: &VersionInfo) {
        let mut state = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        state.has_new_version = true;
        state.is_important = info.is_important;
        state.new_version = info.new_version.clone();
        state.description = info.description.clone();
        state.download_assets = info.download_assets.clone();
    }
}
