use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Theatre directory format error: {message}")]
    DirectoryFormatError { message: String },

    #[error("No theatres found in {city}, {province}")]
    NoTheatresFound { city: String, province: String },

    #[error("Invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },
}

/// 單一影院抓取失敗；聚合時略過該影院，不會往上拋
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("API returned status {status}")]
    Status { status: u16 },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response format: {reason}")]
    MalformedResponse { reason: String },
}

impl FetchError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        FetchError::MalformedResponse {
            reason: reason.into(),
        }
    }
}

impl FinderError {
    pub fn user_friendly_message(&self) -> String {
        match self {
            FinderError::HttpError(_) => "Could not reach the showtimes service.".to_string(),
            FinderError::IoError(e) => format!("Could not read a required file: {}", e),
            FinderError::SerializationError(e) => format!("Invalid JSON data: {}", e),
            FinderError::ConfigError { message } => format!("Configuration problem: {}", message),
            FinderError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            FinderError::MissingConfigError { field } => {
                format!("Setting '{}' is required but was not provided", field)
            }
            FinderError::DirectoryFormatError { message } => {
                format!("The theatre directory could not be loaded: {}", message)
            }
            FinderError::NoTheatresFound { city, province } => {
                format!("No theatres are listed for {}, {}", city, province)
            }
            FinderError::InvalidDate { value } => {
                format!("'{}' is not a valid date", value)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FinderError::HttpError(_) => "Check network connectivity and the api.base_url setting",
            FinderError::IoError(_) => "Check that directory.path points to a readable file",
            FinderError::SerializationError(_) | FinderError::DirectoryFormatError { .. } => {
                "The theatre file must be a JSON list or an object with nearbyTheatres/otherTheatres"
            }
            FinderError::ConfigError { .. } | FinderError::InvalidConfigValueError { .. } => {
                "Review the TOML configuration file"
            }
            FinderError::MissingConfigError { .. } => {
                "Set it in the config file, pass it as a flag, or export CINEPLEX_API_KEY"
            }
            FinderError::NoTheatresFound { .. } => {
                "Check the city spelling and use a two-letter province code such as 'qc' or 'on'"
            }
            FinderError::InvalidDate { .. } => "Use the YYYY-MM-DD format, e.g. 2024-06-01",
        }
    }
}

pub type Result<T> = std::result::Result<T, FinderError>;
