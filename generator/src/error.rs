//! Error types for the topic generator.

use thiserror::Error;

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Errors that can occur while setting up or running the generator.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// Error from the underlying rdkafka library.
    #[error("Kafka error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    /// Error loading settings.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The scheduler was given a zero or unschedulable period.
    #[error("Scheduler period must be greater than zero and representable as a deadline")]
    InvalidPeriod,

    /// The producer dropped a delivery before reporting its outcome.
    #[error("Delivery to topic '{0}' was canceled")]
    DeliveryCanceled(String),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}
