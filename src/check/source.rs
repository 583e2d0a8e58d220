//! Version source trait: the seam between the coordinator and a backend

#[cfg(test)]
use mockall::automock;

use crate::check::error::SourceError;
use crate::check::types::CheckOutcome;

/// A backend that reports the latest published release.
///
/// Exactly one implementation is selected at startup from the configured
/// channel; the rest of the engine only sees this trait.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait VersionSource: Send + Sync {
    /// Channel name used in log lines.
    fn channel(&self) -> &'static str;

    /// Fetches the latest release metadata.
    ///
    /// # Returns
    /// * `Ok(CheckOutcome)` - What the source knows; a reachable source with
    ///   no qualifying release answers success with an empty `newVersion`
    /// * `Err(SourceError)` - Transport failure or undecodable response
    async fn fetch(&self) -> Result<CheckOutcome, SourceError>;
}
