//! Settings for the generator process.
//!
//! Values are layered: built-in defaults, then an optional `config/default`
//! file, then `GENERATOR__`-prefixed environment variables such as
//! `GENERATOR__KAFKA__BROKERS`.

use crate::error::Result;
use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_BROKERS: &str = "localhost:9092";
const DEFAULT_TOPIC: &str = "mytopic";
const DEFAULT_MESSAGE_TIMEOUT_MS: u64 = 5000;
const DEFAULT_CHANNEL: &str = "mytopic-publisher";
const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Top-level settings for the generator.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    pub kafka: KafkaSettings,
    pub emitter: EmitterSettings,
}

/// Connection and topic binding for the Kafka producer.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct KafkaSettings {
    /// Comma-separated list of Kafka brokers.
    pub brokers: String,

    /// Topic every message is published to.
    pub topic: String,

    /// How long librdkafka keeps trying to deliver a message.
    pub message_timeout_ms: u64,
}

/// Emitter schedule and reporting.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EmitterSettings {
    /// Name of the outbound channel, used in logs.
    pub channel: String,

    /// Seconds between ticks.
    pub interval_secs: u64,

    /// Log the outcome of every delivery instead of dropping it.
    pub delivery_reports: bool,
}

impl EmitterSettings {
    /// The tick period.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            kafka: KafkaSettings {
                brokers: DEFAULT_BROKERS.to_string(),
                topic: DEFAULT_TOPIC.to_string(),
                message_timeout_ms: DEFAULT_MESSAGE_TIMEOUT_MS,
            },
            emitter: EmitterSettings {
                channel: DEFAULT_CHANNEL.to_string(),
                interval_secs: DEFAULT_INTERVAL_SECS,
                delivery_reports: false,
            },
        }
    }
}

/// Loads settings from `config/default` and the environment.
pub fn load_config() -> Result<Settings> {
    let builder = defaults()?
        .add_source(File::with_name("config/default").required(false))
        .add_source(environment());

    Ok(builder.build()?.try_deserialize()?)
}

/// Loads settings from a specific file, without consulting the environment.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Settings> {
    let builder = defaults()?.add_source(File::from(path.as_ref()));

    Ok(builder.build()?.try_deserialize()?)
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("kafka.brokers", DEFAULT_BROKERS)?
        .set_default("kafka.topic", DEFAULT_TOPIC)?
        .set_default("kafka.message_timeout_ms", DEFAULT_MESSAGE_TIMEOUT_MS)?
        .set_default("emitter.channel", DEFAULT_CHANNEL)?
        .set_default("emitter.interval_secs", DEFAULT_INTERVAL_SECS)?
        .set_default("emitter.delivery_reports", false)?)
}

fn environment() -> Environment {
    Environment::with_prefix("GENERATOR")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.kafka.brokers, "localhost:9092");
        assert_eq!(settings.kafka.topic, "mytopic");
        assert_eq!(settings.kafka.message_timeout_ms, 5000);
        assert_eq!(settings.emitter.channel, "mytopic-publisher");
        assert_eq!(settings.emitter.interval(), Duration::from_secs(5));
        assert!(!settings.emitter.delivery_reports);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[kafka]\nbrokers = \"broker-1:9092,broker-2:9092\"\n\n[emitter]\ninterval_secs = 1"
        )
        .unwrap();

        let settings = load_config_from(file.path()).unwrap();
        assert_eq!(settings.kafka.brokers, "broker-1:9092,broker-2:9092");
        assert_eq!(settings.kafka.topic, "mytopic");
        assert_eq!(settings.emitter.interval(), Duration::from_secs(1));
        assert_eq!(settings.emitter.channel, "mytopic-publisher");
    }

    #[test]
    fn test_environment_overrides_defaults() {
        temp_env::with_vars(
            [
                ("GENERATOR__KAFKA__BROKERS", Some("b:1")),
                ("GENERATOR__EMITTER__INTERVAL_SECS", Some("7")),
                ("GENERATOR__EMITTER__DELIVERY_REPORTS", Some("true")),
            ],
            || {
                let settings = load_config().unwrap();
                assert_eq!(settings.kafka.brokers, "b:1");
                assert_eq!(settings.kafka.topic, "mytopic");
                assert_eq!(settings.emitter.interval(), Duration::from_secs(7));
                assert!(settings.emitter.delivery_reports);
            },
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_config_from("does/not/exist.toml").is_err());
    }
}
