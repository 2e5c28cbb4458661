//! The periodic emitter: one message per scheduler tick.

use crate::clock::{Clock, SystemClock};
use crate::ids::{IdGenerator, RandomIds};
use crate::publisher::Publisher;
use kafka_messages::{KafkaMessage, OutboundMessage};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Builds a timestamped, UUID-tagged message on every tick and submits it to
/// a publisher.
///
/// The emitter holds no state between ticks. Submission is fire-and-forget:
/// the delivery returned by the publisher is dropped unless delivery reports
/// are enabled, in which case its outcome is logged from a spawned task. A
/// failed delivery is never retried.
///
/// # Example
///
/// ```no_run
/// use kafka_topic_generator::{KafkaPublisher, PeriodicEmitter, Settings};
/// use std::sync::Arc;
///
/// # fn example() -> anyhow::Result<()> {
/// let publisher = KafkaPublisher::new(&Settings::default().kafka)?;
/// let emitter = PeriodicEmitter::new(Arc::new(publisher));
/// emitter.on_tick();
/// # Ok(())
/// # }
/// ```
pub struct PeriodicEmitter {
    publisher: Arc<dyn Publisher>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    delivery_reports: bool,
}

impl PeriodicEmitter {
    /// Creates an emitter that reads the system clock and draws random v4 ids.
    ///
    /// # Arguments
    ///
    /// * `publisher` - Channel every tick's message is submitted to
    pub fn new(publisher: Arc<dyn Publisher>) -> Self {
        Self {
            publisher,
            clock: Arc::new(SystemClock),
            ids: Arc::new(RandomIds),
            delivery_reports: false,
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the identifier source.
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    /// Logs each delivery's outcome instead of dropping it.
    pub fn with_delivery_reports(mut self, enabled: bool) -> Self {
        self.delivery_reports = enabled;
        self
    }

    /// Builds the message for the current instant.
    pub fn next_message(&self) -> OutboundMessage {
        OutboundMessage::new(self.clock.now(), self.ids.next_id())
    }

    /// Emits one message.
    pub fn on_tick(&self) {
        let message = self.next_message();
        let payload = message.payload();
        debug!("Emitting '{}'", payload);

        let delivery = self.publisher.submit_with_key(payload, message.key());

        if !self.delivery_reports {
            return;
        }

        // Outside a runtime there is nowhere to await the report.
        if let Ok(handle) = Handle::try_current() {
            handle.spawn(async move {
                match delivery.await {
                    Ok(()) => debug!("Message delivered"),
                    Err(e) => warn!("Message delivery failed: {}", e),
                }
            });
        }
    }
}
