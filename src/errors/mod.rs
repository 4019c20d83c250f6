use thiserror::Error;

#[derive(Error, Debug)]
pub enum PushError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed returned HTTP status {0}")]
    HttpStatus(u16),

    // Parsing errors
    #[error("Feed parsing failed: {0}")]
    FeedParse(String),

    // State file errors
    #[error("State file error: {0}")]
    State(String),

    // Mail errors
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("SMTP authentication failed: {0}")]
    Authentication(String),

    #[error("Mail delivery failed: {0}")]
    Delivery(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<lettre::transport::smtp::Error> for PushError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        PushError::Delivery(err.to_string())
    }
}

impl From<lettre::address::AddressError> for PushError {
    fn from(err: lettre::address::AddressError) -> Self {
        PushError::InvalidAddress(err.to_string())
    }
}

impl From<lettre::error::Error> for PushError {
    fn from(err: lettre::error::Error) -> Self {
        PushError::Delivery(err.to_string())
    }
}

pub type PushResult<T> = Result<T, PushError>;
