use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinewatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered but reported a failure (`status != "success"` or an
    /// `error` field in the payload).
    #[error("Backend error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("TUI error: {0}")]
    Tui(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl LinewatchError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        LinewatchError::Config(msg.into())
    }

    pub fn network<S: Into<String>>(msg: S) -> Self {
        LinewatchError::Network(msg.into())
    }

    pub fn api<S: Into<String>>(msg: S) -> Self {
        LinewatchError::Api(msg.into())
    }

    pub fn parse<S: Into<String>>(msg: S) -> Self {
        LinewatchError::Parse(msg.into())
    }

    pub fn tui<S: Into<String>>(msg: S) -> Self {
        LinewatchError::Tui(msg.into())
    }
}

/// Result type alias for linewatch operations
pub type LinewatchResult<T> = Result<T, LinewatchError>;
