//! Kafka-backed publisher bound to a single topic.

use crate::config::KafkaSettings;
use crate::error::{GeneratorError, Result};
use crate::publisher::{Delivery, Publisher};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer as RdProducer};
use rdkafka::ClientConfig;
use std::future;
use std::time::Duration;
use tracing::{debug, error, info};

/// Publishes string payloads to one Kafka topic.
///
/// `submit` enqueues the record in librdkafka's buffer before returning, so
/// the returned [`Delivery`] can be dropped without losing the message.
///
/// # Example
///
/// ```no_run
/// use kafka_topic_generator::{KafkaPublisher, Publisher, Settings};
///
/// # async fn example() -> anyhow::Result<()> {
/// let publisher = KafkaPublisher::new(&Settings::default().kafka)?;
/// publisher.submit("hello".to_string()).await?;
/// # Ok(())
/// # }
/// ```
pub struct KafkaPublisher {
    inner: FutureProducer,
    topic: String,
}

impl KafkaPublisher {
    /// Creates a producer for the configured brokers and topic.
    ///
    /// # Arguments
    ///
    /// * `settings` - Brokers, destination topic and message timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the producer cannot be created.
    pub fn new(settings: &KafkaSettings) -> Result<Self> {
        info!(
            "Creating Kafka producer with brokers: {}, topic: {}",
            settings.brokers, settings.topic
        );

        let mut config = ClientConfig::new();
        config
            .set("bootstrap.servers", &settings.brokers)
            .set("message.timeout.ms", settings.message_timeout_ms.to_string());

        Self::from_config(config, &settings.topic)
    }

    /// Creates a producer from a pre-configured `ClientConfig`.
    ///
    /// # Arguments
    ///
    /// * `config` - Pre-configured ClientConfig
    /// * `topic` - Topic every submitted payload is published to
    ///
    /// # Errors
    ///
    /// Returns an error if the producer cannot be created.
    pub fn from_config(config: ClientConfig, topic: impl Into<String>) -> Result<Self> {
        let producer: FutureProducer = config.create()?;
        Ok(Self {
            inner: producer,
            topic: topic.into(),
        })
    }

    /// The topic this publisher is bound to.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Waits for buffered messages to be delivered.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush does not finish within `timeout`.
    pub fn flush(&self, timeout: Duration) -> Result<()> {
        RdProducer::flush(&self.inner, timeout)?;
        Ok(())
    }
}

impl Publisher for KafkaPublisher {
    fn submit(&self, payload: String) -> Delivery {
        self.submit_with_key(payload, None)
    }

    fn submit_with_key(&self, payload: String, key: Option<String>) -> Delivery {
        debug!(
            "Submitting message to topic '{}' with key {:?} ({} bytes)",
            self.topic,
            key,
            payload.len()
        );

        let record = FutureRecord {
            topic: self.topic.as_str(),
            partition: None,
            payload: Some(payload.as_bytes()),
            key: key.as_deref().map(str::as_bytes),
            timestamp: None,
            headers: None,
        };

        let topic = self.topic.clone();
        match self.inner.send_result(record) {
            Ok(delivery) => Box::pin(async move {
                match delivery.await {
                    Ok(Ok((partition, offset))) => {
                        debug!(
                            "Message delivered to topic '{}' (partition: {}, offset: {})",
                            topic, partition, offset
                        );
                        Ok(())
                    }
                    Ok(Err((kafka_err, _msg))) => Err(GeneratorError::Kafka(kafka_err)),
                    Err(_canceled) => Err(GeneratorError::DeliveryCanceled(topic)),
                }
            }),
            Err((kafka_err, _record)) => {
                error!("Failed to enqueue message for topic '{}': {}", topic, kafka_err);
                Box::pin(future::ready(Err(GeneratorError::Kafka(kafka_err))))
            }
        }
    }
}
