use crate::booking::Stage;

/// Failures reported by the backend or the transport underneath it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The response envelope carried `isSuccess=false`. Holds the backend's message as-is.
    #[error("{0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("response envelope carried no data")]
    MissingData,
    #[error("failed to decode response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// A selection was made before the stage it depends on. Caller bug.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("selection is not among the latest offered options; refresh and select again")]
    StaleSelection,
    #[error("{stage} options are unavailable: {source}")]
    Unavailable {
        stage: Stage,
        #[source]
        source: ApiError,
    },
    /// Booking creation failed. Displayed to the user verbatim.
    #[error("{0}")]
    Submission(String),
    #[error("step {} ({stage}) is incomplete", .stage.number())]
    Incomplete { stage: Stage },
}

pub type BookingResult<T> = std::result::Result<T, BookingError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid {name} URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
