//! Typed error handling for the admin dashboard core
//!
//! Batch operations (resolution, bulk mutation) never return errors: they
//! settle every item and report a structured outcome instead. The errors
//! below cover the places where a caller does get a `Result`:
//!
//! - [`StoreError`]: durable store read/write failures
//! - [`ConfigError`]: configuration parsing and validation
//! - [`ValidationError`]: malformed user input (sort expressions, status labels, product edits)
//! - [`AdminError::Mutation`]: a single remote mutation the backend refused
//!
//! # Example
//!
//! ```rust,ignore
//! match change_status(&mut orders, &client, "64ab", OrderStatus::Shipped).await {
//!     Ok(()) => println!("Order status updated"),
//!     Err(AdminError::Mutation { id, message }) => eprintln!("{}: {}", id, message),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use std::fmt;

/// The main error type for the dashboard core
#[derive(Debug)]
pub enum AdminError {
    /// Durable store errors
    Store(StoreError),

    /// Configuration errors
    Config(ConfigError),

    /// Validation errors
    Validation(ValidationError),

    /// The backend rejected or failed a mutation on a single record
    Mutation { id: String, message: String },
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminError::Store(e) => write!(f, "{}", e),
            AdminError::Config(e) => write!(f, "{}", e),
            AdminError::Validation(e) => write!(f, "{}", e),
            AdminError::Mutation { id, message } => {
                write!(f, "Mutation failed for '{}': {}", id, message)
            }
        }
    }
}

impl std::error::Error for AdminError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AdminError::Store(e) => Some(e),
            AdminError::Config(e) => Some(e),
            AdminError::Validation(e) => Some(e),
            AdminError::Mutation { .. } => None,
        }
    }
}

impl AdminError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AdminError::Store(e) => e.error_code(),
            AdminError::Config(_) => "CONFIG_ERROR",
            AdminError::Validation(_) => "VALIDATION_ERROR",
            AdminError::Mutation { .. } => "MUTATION_FAILED",
        }
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors raised by a [`DurableStore`](crate::core::store::DurableStore)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The write exceeds the store's capacity
    #[error("Storage quota exceeded: {size} bytes requested, {quota} bytes available")]
    QuotaExceeded { size: usize, quota: usize },

    /// Underlying I/O failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Cache contents could not be serialized or parsed
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store is not available (lock poisoned, backend closed)
    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    pub fn error_code(&self) -> &'static str {
        match self {
            StoreError::QuotaExceeded { .. } => "STORE_QUOTA_EXCEEDED",
            StoreError::Io(_) => "STORE_IO_ERROR",
            StoreError::Serialization(_) => "STORE_SERIALIZATION_ERROR",
            StoreError::Unavailable { .. } => "STORE_UNAVAILABLE",
        }
    }
}

impl From<StoreError> for AdminError {
    fn from(err: StoreError) -> Self {
        AdminError::Store(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration file
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    InvalidValue { field: String, message: String },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::InvalidValue { field, message } => {
                write!(f, "Invalid value for field '{}': {}", field, message)
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for AdminError {
    fn from(err: ConfigError) -> Self {
        AdminError::Config(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Order status label outside the closed set of known statuses
    UnknownStatus { value: String },

    /// Sort expression could not be parsed
    InvalidSort { value: String, message: String },

    /// A submitted field is missing or out of range
    InvalidField { field: String, message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownStatus { value } => {
                write!(f, "Unknown order status: '{}'", value)
            }
            ValidationError::InvalidSort { value, message } => {
                write!(f, "Invalid sort expression '{}': {}", value, message)
            }
            ValidationError::InvalidField { field, message } => {
                write!(f, "Invalid value for '{}': {}", field, message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for AdminError {
    fn from(err: ValidationError) -> Self {
        AdminError::Validation(err)
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for dashboard operations
pub type AdminResult<T> = Result<T, AdminError>;

// =============================================================================
// Tests
// =============================================================================
