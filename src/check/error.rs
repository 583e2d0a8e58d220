use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("malformed component {component:?} in version {version:?}")]
    MalformedComponent { version: String, component: String },
}
