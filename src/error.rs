use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /* service errors */
    #[error("{0}")]
    Service(String),

    /* mapped errors */
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),

    #[error(transparent)]
    UrlError(#[from] url::ParseError),

    #[error(transparent)]
    ConfigError(#[from] config::ConfigError),

    #[error(transparent)]
    SetLoggerError(#[from] log::SetLoggerError),
}

impl ApiError {
    #[must_use]
    pub fn service_error(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
