use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandpadError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Landmark source error: {0}")]
    Source(#[from] SourceError),

    #[error("Input injector error: {0}")]
    Injector(#[from] InjectorError),

    #[error("System error: {message}")]
    System { message: String },
}

impl HandpadError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }
}

/// Failures of the landmark source collaborator
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open landmark source {source_name}: {details}")]
    Open { source_name: String, details: String },

    #[error("Failed to read landmark frame: {0}")]
    Read(#[from] std::io::Error),

    #[error("Too many consecutive malformed frames ({count}), last error: {details}")]
    Malformed { count: u32, details: String },

    #[error("Detector process exited: {0}")]
    DetectorExited(String),
}

/// Failures of the key injection collaborator
#[derive(Error, Debug)]
pub enum InjectorError {
    #[error("Failed to create virtual keyboard: {details}")]
    DeviceCreate { details: String },

    #[error("Failed to emit {action} for key {key}: {details}")]
    Emit {
        key: String,
        action: &'static str,
        details: String,
    },

    #[error("Key injection not available on this system")]
    NotAvailable,
}

pub type Result<T> = std::result::Result<T, HandpadError>;
