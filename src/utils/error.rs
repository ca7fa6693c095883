use thiserror::Error;

#[derive(Error, Debug)]
pub enum GestaoError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("{resource} not found: {key}")]
    NotFound { resource: String, key: String },

    #[error("{service} returned HTTP {status}")]
    UpstreamStatus { service: String, status: u16 },

    #[error("{service} request timed out")]
    Timeout { service: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GestaoError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        GestaoError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GestaoError::ApiError(_)
            | GestaoError::UpstreamStatus { .. }
            | GestaoError::Timeout { .. } => ErrorCategory::Network,
            GestaoError::ConfigValidationError { .. }
            | GestaoError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            GestaoError::InvalidInput { .. } => ErrorCategory::Input,
            GestaoError::NotFound { .. }
            | GestaoError::CsvError(_)
            | GestaoError::SerializationError(_) => ErrorCategory::Data,
            GestaoError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GestaoError::NotFound { .. } => ErrorSeverity::Low,
            GestaoError::ApiError(_)
            | GestaoError::UpstreamStatus { .. }
            | GestaoError::Timeout { .. } => ErrorSeverity::Medium,
            GestaoError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Lookup failures the user can simply try again.
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Network
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the network connection and try again",
            ErrorCategory::Configuration => "Review the configuration file and CLI arguments",
            ErrorCategory::Input => "Check the value typed into the field",
            ErrorCategory::Data => "Verify the identifier or the input file contents",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }

    /// Message shown to end users of the form.
    pub fn user_friendly_message(&self) -> String {
        match self {
            GestaoError::NotFound { resource, .. } => format!("{} não encontrado", resource),
            GestaoError::Timeout { .. } => "Tempo limite excedido".to_string(),
            GestaoError::UpstreamStatus { status, .. } => format!("Erro na API: {}", status),
            GestaoError::ApiError(_) => "Erro ao consultar o serviço. Tente novamente.".to_string(),
            GestaoError::InvalidInput { reason, .. } => reason.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GestaoError>;
