//! Common types shared across the check engine

use serde::{Deserialize, Serialize};

// =============================================================================
// Outcome codes
// =============================================================================
//
// The numeric codes are part of the private-server wire contract and must not
// be renumbered.

/// Success; `data` carries the fetched release metadata.
pub const CODE_OK: i32 = 0;

/// Transport failure: connect error, timeout, or non-2xx status.
pub const CODE_TRANSPORT: i32 = 1;

/// Source was reachable but returned unusable data.
pub const CODE_BAD_DATA: i32 = 2;

/// Source was reachable and no strictly newer version exists.
pub const CODE_UP_TO_DATE: i32 = 10;

/// A downloadable artifact attached to a release.
///
/// `id` is assigned by the source and is not guaranteed unique across
/// channels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadAsset {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub size: u64,
    pub download_count: u64,
}

/// Normalized release metadata produced by a successful fetch.
///
/// `download_assets` is only meaningful when `new_version` is non-empty; an
/// empty `new_version` means the source had no qualifying release to offer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionInfo {
    pub new_version: String,
    /// Free-text release notes, may contain markup.
    pub description: String,
    /// Whether the release should be flagged prominently.
    pub is_important: bool,
    pub download_assets: Vec<DownloadAsset>,
}

/// Result of one check cycle.
///
/// This is also the document shape a private update server responds with, so
/// the field names and codes are wire-stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckOutcome {
    pub code: i32,
    /// True only for [`CODE_OK`].
    pub success: bool,
    pub description: String,
    /// Populated on success, zero-valued otherwise.
    pub data: VersionInfo,
}

/// Three-valued reading of an outcome, for callers that do not care about the
/// wire-level code/success split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// A strictly newer qualifying release exists.
    UpdateAvailable,
    /// The source answered and nothing newer is published.
    UpToDate,
    /// The check could not produce an answer.
    Failed,
}

impl CheckOutcome {
    /// Successful outcome carrying release metadata.
    pub fn ok(description: impl Into<String>, data: VersionInfo) -> Self {
        Self {
            code: CODE_OK,
            success: true,
            description: description.into(),
            data,
        }
    }

    /// Non-success outcome with zero-valued data.
    pub fn failure(code: i32, description: impl Into<String>) -> Self {
        Self {
            code,
            success: false,
            description: description.into(),
            data: VersionInfo::default(),
        }
    }

    pub fn status(&self) -> CheckStatus {
        match self.code {
            CODE_OK if self.data.new_version.is_empty() => CheckStatus::UpToDate,
            CODE_OK => CheckStatus::UpdateAvailable,
            CODE_UP_TO_DATE => CheckStatus::UpToDate,
            _ => CheckStatus::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outcome_decodes_private_server_document() {
        let outcome = serde_json::from_value::<CheckOutcome>(json!({
            "code": 0,
            "success": true,
            "description": "new release",
            "data": {
                "newVersion": "v1.4.0",
                "description": "<li>fixes</li>",
                "isImportant": true,
                "downloadAssets": [
                    {"id": 7, "name": "app.tar.gz", "url": "https://dl/app.tar.gz", "size": 1024, "downloadCount": 3}
                ]
            }
        }))
        .unwrap();

        assert!(outcome.success);
        assert_eq!(outcome.data.new_version, "v1.4.0");
        assert!(outcome.data.is_important);
        assert_eq!(outcome.data.download_assets[0].download_count, 3);
    }

    #[test]
    fn outcome_decodes_with_missing_data_as_defaults() {
        let outcome =
            serde_json::from_value::<CheckOutcome>(json!({"code": 10, "success": false}))
                .unwrap();

        assert_eq!(outcome.code, CODE_UP_TO_DATE);
        assert_eq!(outcome.data, VersionInfo::default());
    }

    #[test]
    fn status_distinguishes_empty_success_from_update() {
        let empty = CheckOutcome::ok("nothing qualifying", VersionInfo::default());
        assert_eq!(empty.status(), CheckStatus::UpToDate);

        let update = CheckOutcome::ok(
            "new release",
            VersionInfo {
                new_version: "v2.0.0".to_string(),
                ..VersionInfo::default()
            },
        );
        assert_eq!(update.status(), CheckStatus::UpdateAvailable);

        assert_eq!(
            CheckOutcome::failure(CODE_TRANSPORT, "unreachable").status(),
            CheckStatus::Failed
        );
        assert_eq!(
            CheckOutcome::failure(CODE_UP_TO_DATE, "nothing newer").status(),
            CheckStatus::UpToDate
        );
    }
}
