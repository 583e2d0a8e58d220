//! Public release-registry source (GitHub releases API)

use serde::Deserialize;
use tracing::{debug, warn};

use crate::check::error::SourceError;
use crate::check::source::VersionSource;
use crate::check::types::{CheckOutcome, DownloadAsset, VersionInfo};
use crate::config::FETCH_TIMEOUT;

/// Default base URL for the GitHub API
const DEFAULT_BASE_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("upgrade-notify/", env!("CARGO_PKG_VERSION"));

/// Latest-release document returned by the registry.
///
/// Every field is required; a response missing any of them is reported as a
/// parse failure instead of defaulting.
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    body: String,
    target_commitish: String,
    prerelease: bool,
    assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Deserialize)]
struct ReleaseAsset {
    id: i64,
    name: String,
    size: u64,
    download_count: u64,
    browser_download_url: String,
}

/// Fetches the latest release of a fixed project from the public registry.
pub struct RegistrySource {
    client: reqwest::Client,
    base_url: String,
    project: String,
    stable_branch: String,
}

impl RegistrySource {
    pub fn new(project: &str, stable_branch: &str) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, project, stable_branch)
    }

    /// Creates a RegistrySource against a custom base URL
    pub fn with_base_url(base_url: &str, project: &str, stable_branch: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
            project: project.to_string(),
            stable_branch: stable_branch.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl VersionSource for RegistrySource {
    fn channel(&self) -> &'static str {
        "registry"
    }

    async fn fetch(&self) -> Result<CheckOutcome, SourceError> {
        let url = format!("{}/repos/{}/releases/latest", self.base_url, self.project);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("registry returned status {}: {}", status, url);
            return Err(SourceError::Status(status));
        }

        let release: Release = response.json().await.map_err(|e| {
            warn!("failed to parse registry release response: {}", e);
            SourceError::MalformedResponse(e.to_string())
        })?;

        // Only stable releases targeting the stable branch qualify; anything
        // else is a legitimate "nothing new", not an error.
        if release.prerelease || release.target_commitish != self.stable_branch {
            debug!(
                tag = %release.tag_name,
                prerelease = release.prerelease,
                branch = %release.target_commitish,
                "latest release does not qualify"
            );
            return Ok(CheckOutcome::ok(
                "no qualifying release published",
                VersionInfo::default(),
            ));
        }

        let download_assets = release
            .assets
            .into_iter()
            .map(|asset| DownloadAsset {
                id: asset.id,
                name: asset.name,
                url: asset.browser_download_url,
                size: asset.size,
                download_count: asset.download_count,
            })
            .collect();

        Ok(CheckOutcome::ok(
            "fetched latest release from registry",
            VersionInfo {
                new_version: release.tag_name,
                description: release.body,
                is_important: false,
                download_assets,
            },
        ))
    }
}
