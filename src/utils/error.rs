use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned HTTP {status}: {body}")]
    HttpStatusError { status: u16, body: String },

    #[error("GraphQL query errors: [{}]", .messages.join(", "))]
    GraphqlError { messages: Vec<String> },

    #[error("Response is missing field '{path}'")]
    MissingFieldError { path: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration field '{field}' is required")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Stream '{stream}' failed: {source}")]
    StreamError {
        stream: String,
        #[source]
        source: Box<EtlError>,
    },

    #[error("Sync failed for streams: {}", .streams.join(", "))]
    SyncError { streams: Vec<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => ErrorCategory::Network,
            EtlError::GraphqlError { .. }
            | EtlError::MissingFieldError { .. }
            | EtlError::SerializationError(_)
            | EtlError::SyncError { .. } => ErrorCategory::Data,
            EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            EtlError::ZipError(_) | EtlError::IoError(_) => ErrorCategory::System,
            EtlError::StreamError { source, .. } => source.category(),
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路錯誤通常可以重試
            EtlError::ApiError(_) => ErrorSeverity::Medium,
            EtlError::HttpStatusError { status, .. } if *status == 429 || *status >= 500 => {
                ErrorSeverity::Medium
            }
            EtlError::HttpStatusError { .. } => ErrorSeverity::High,
            EtlError::GraphqlError { .. }
            | EtlError::MissingFieldError { .. }
            | EtlError::SerializationError(_)
            | EtlError::SyncError { .. } => ErrorSeverity::High,
            EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => ErrorSeverity::High,
            EtlError::ZipError(_) | EtlError::IoError(_) => ErrorSeverity::Critical,
            EtlError::StreamError { source, .. } => source.severity(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(_) => {
                "Check network connectivity to partners.shopify.com and retry".to_string()
            }
            EtlError::HttpStatusError { status: 401, .. }
            | EtlError::HttpStatusError { status: 403, .. } => {
                "Verify api_key has Partner API access for this organization".to_string()
            }
            EtlError::HttpStatusError { status: 404, .. } => {
                "Verify partner_id and api_version".to_string()
            }
            EtlError::HttpStatusError { .. } => "Retry later; the API may be throttling".to_string(),
            EtlError::GraphqlError { .. } => {
                "Verify application_id and that api_version supports the requested fields"
                    .to_string()
            }
            EtlError::MissingFieldError { .. } => {
                "The API response shape changed or does not match this stream".to_string()
            }
            EtlError::SerializationError(_) => {
                "The API response did not match the expected page shape".to_string()
            }
            EtlError::MissingConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::ConfigValidationError { .. } => {
                "Fix the configuration file and run with --check".to_string()
            }
            EtlError::ZipError(_) | EtlError::IoError(_) => {
                "Check that output_path is writable and has free space".to_string()
            }
            EtlError::StreamError { source, .. } => source.recovery_suggestion(),
            EtlError::SyncError { .. } => {
                "See manifest.json for per-stream errors and rerun the failed streams".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the Partner API: {}", self),
            ErrorCategory::Data => format!("Unexpected data from the Partner API: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
