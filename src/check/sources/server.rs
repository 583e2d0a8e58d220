//! Private update-server source

use tracing::warn;

use crate::check::error::SourceError;
use crate::check::source::VersionSource;
use crate::check::types::CheckOutcome;
use crate::config::FETCH_TIMEOUT;

const USER_AGENT: &str = concat!("upgrade-notify/", env!("CARGO_PKG_VERSION"));

/// Fetches a fully-formed [`CheckOutcome`] document from an
/// operator-configured endpoint.
///
/// The server owns the interpretation: its document is decoded as-is, with no
/// gating or field rewriting on this side.
pub struct ServerSource {
    client: reqwest::Client,
    url: String,
}

impl ServerSource {
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
            url: url.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl VersionSource for ServerSource {
    fn channel(&self) -> &'static str {
        "private-server"
    }

    async fn fetch(&self) -> Result<CheckOutcome, SourceError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("update server returned status {}: {}", status, self.url);
            return Err(SourceError::Status(status));
        }

        let outcome: CheckOutcome = response.json().await.map_err(|e| {
            warn!("failed to parse update server response: {}", e);
            SourceError::MalformedResponse(e.to_string())
        })?;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::types::{CODE_BAD_DATA, CODE_OK};
    use mockito::Server;

    #[tokio::test]
    async fn fetch_decodes_outcome_document_as_is() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "code": 0,
                    "success": true,
                    "description": "new release available",
                    "data": {
                        "newVersion": "v3.1.0",
                        "description": "<li>faster search</li>",
                        "isImportant": true,
                        "downloadAssets": [
                            {"id": 1, "name": "wiki.zip", "url": "https://dl/wiki.zip", "size": 2048, "downloadCount": 9}
                        ]
                    }
                }"#,
            )
            .create_async()
            .await;

        let source = ServerSource::new(&server.url());
        let outcome = source.fetch().await.unwrap();

        mock.assert_async().await;
        assert_eq!(outcome.code, CODE_OK);
        assert_eq!(outcome.data.new_version, "v3.1.0");
        assert!(outcome.data.is_important);
    }

    #[tokio::test]
    async fn fetch_passes_server_reported_failure_through() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"code": 2, "success": false, "description": "maintenance window"}"#)
            .create_async()
            .await;

        let source = ServerSource::new(&server.url());
        let outcome = source.fetch().await.unwrap();

        mock.assert_async().await;
        assert_eq!(outcome.code, CODE_BAD_DATA);
        assert!(!outcome.success);
        assert_eq!(outcome.description, "maintenance window");
    }

    #[tokio::test]
    async fn fetch_reports_non_2xx_as_status_error() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/")
            .with_status(404)
            .create_async()
            .await;

        let source = ServerSource::new(&server.url());
        let result = source.fetch().await;

        mock.assert_async().await;
        assert!(matches!(
            result,
            Err(SourceError::Status(status)) if status.as_u16() == 404
        ));
    }

    #[tokio::test]
    async fn fetch_reports_undecodable_body_as_malformed_response() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let source = ServerSource::new(&server.url());
        let result = source.fetch().await;

        mock.assert_async().await;
        assert!(matches!(result, Err(SourceError::MalformedResponse(_))));
    }
}
