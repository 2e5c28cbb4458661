//! Payload types for the Kafka topic generator.
//!
//! This crate provides the `KafkaMessage` trait implemented by everything the
//! generator publishes, and `OutboundMessage`, the timestamped, UUID-tagged
//! record emitted on every tick.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Trait for types that can be published as Kafka payloads.
///
/// Payloads are plain text: the default encoding is the type's `Display` output.
/// Messages are unkeyed unless the type overrides `key`.
///
/// # Example
///
/// ```
/// use kafka_messages::KafkaMessage;
/// use std::fmt;
///
/// struct Heartbeat;
///
/// impl fmt::Display for Heartbeat {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str("ping")
///     }
/// }
///
/// impl KafkaMessage for Heartbeat {}
///
/// assert_eq!(Heartbeat.payload(), "ping");
/// assert_eq!(Heartbeat.key(), None);
/// ```
pub trait KafkaMessage: fmt::Display + Send + Sync {
    /// Encodes the message as the string handed to the publisher.
    fn payload(&self) -> String {
        self.to_string()
    }

    /// Record key used for partition assignment, if any.
    fn key(&self) -> Option<String> {
        None
    }
}

/// The message emitted on every generator tick.
///
/// Rendered as `Data tanggal : <timestamp>; id : <uuid>`, where the timestamp
/// is RFC 3339 in UTC with whole seconds and the id is a hyphenated UUID.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use kafka_messages::OutboundMessage;
/// use uuid::Uuid;
///
/// let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let id = Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap();
///
/// assert_eq!(
///     OutboundMessage::new(timestamp, id).to_string(),
///     "Data tanggal : 2024-01-01T00:00:00Z; id : 123e4567-e89b-12d3-a456-426614174000"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Wall-clock time the message was generated.
    pub timestamp: DateTime<Utc>,

    /// Random identifier drawn for this message.
    pub id: Uuid,
}

impl OutboundMessage {
    /// Fixed label between `Data` and the timestamp.
    pub const LABEL: &'static str = "tanggal";

    const ID_SEPARATOR: &'static str = "; id : ";

    /// Creates a message from its timestamp and identifier.
    pub fn new(timestamp: DateTime<Utc>, id: Uuid) -> Self {
        Self { timestamp, id }
    }
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Data {} : {}{}{}",
            Self::LABEL,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            Self::ID_SEPARATOR,
            self.id.hyphenated()
        )
    }
}

impl KafkaMessage for OutboundMessage {}

/// Errors returned when a payload does not match the outbound message format.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseMessageError {
    /// The payload does not start with `Data tanggal : `.
    #[error("missing 'Data {} : ' prefix", OutboundMessage::LABEL)]
    MissingPrefix,

    /// The payload has no `; id : ` separator.
    #[error("missing '; id : ' separator")]
    MissingIdSeparator,

    /// The timestamp is not RFC 3339.
    #[error("invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    /// The id is not a UUID.
    #[error("invalid id '{0}'")]
    InvalidId(String),
}

impl FromStr for OutboundMessage {
    type Err = ParseMessageError;

    fn from_str(payload: &str) -> Result<Self, Self::Err> {
        let rest = payload
            .strip_prefix("Data ")
            .and_then(|rest| rest.strip_prefix(Self::LABEL))
            .and_then(|rest| rest.strip_prefix(" : "))
            .ok_or(ParseMessageError::MissingPrefix)?;

        let (timestamp, id) = rest
            .split_once(Self::ID_SEPARATOR)
            .ok_or(ParseMessageError::MissingIdSeparator)?;

        let timestamp = DateTime::parse_from_rfc3339(timestamp)
            .map_err(|_| ParseMessageError::InvalidTimestamp(timestamp.to_string()))?
            .with_timezone(&Utc);
        let id = Uuid::parse_str(id).map_err(|_| ParseMessageError::InvalidId(id.to_string()))?;

        Ok(Self { timestamp, id })
    }
}
