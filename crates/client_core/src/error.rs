use thiserror::Error;

/// Push-channel connection failures.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("server url must start with http:// or https://: {0}")]
    InvalidServerUrl(String),
    #[error("failed to connect push channel: {0}")]
    Connect(String),
}
