use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(reqwest::StatusCode),
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[cfg(feature = "socket")]
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[cfg(feature = "socket")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Socket.IO protocol error: {0}")]
    Protocol(String),
    #[error("Login rejected: {0}")]
    LoginRejected(String),
    #[error("Monitor rejected: {0}")]
    MonitorRejected(String),
    #[error("Timed out waiting for {0}")]
    Timeout(&'static str),
}
