//! Periodic Kafka topic generator.
//!
//! Every tick, the generator publishes a message of the form
//! `Data tanggal : <timestamp>; id : <uuid>` to a single Kafka topic. The
//! pieces are wired explicitly at startup:
//!
//! - [`Publisher`]: the outbound channel, implemented over `rdkafka` by
//!   [`KafkaPublisher`]
//! - [`PeriodicEmitter`]: builds and submits one message per tick
//! - [`Scheduler`]: fires the tick on a fixed period until shut down
//! - [`Settings`]: layered configuration loaded with [`load_config`]
//!
//! # Example
//!
//! ```no_run
//! use kafka_topic_generator::{KafkaPublisher, PeriodicEmitter, Scheduler, Settings};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::default();
//!     let publisher = KafkaPublisher::new(&settings.kafka)?;
//!     let emitter = PeriodicEmitter::new(Arc::new(publisher));
//!
//!     let scheduler = Scheduler::new(settings.emitter.interval())?;
//!     scheduler.run(|| emitter.on_tick()).await;
//!     Ok(())
//! }
//! ```

mod clock;
mod config;
mod emitter;
mod error;
mod ids;
mod producer;
mod publisher;
mod scheduler;

pub use crate::config::{load_config, load_config_from, EmitterSettings, KafkaSettings, Settings};
pub use clock::{Clock, FixedClock, SystemClock};
pub use emitter::PeriodicEmitter;
pub use error::{GeneratorError, Result};
pub use ids::{FixedIds, IdGenerator, RandomIds};
pub use producer::KafkaPublisher;
pub use publisher::{Delivery, Publisher};
pub use scheduler::{Scheduler, ShutdownHandle};

/// Re-export the message types for convenience
pub use kafka_messages::{KafkaMessage, OutboundMessage, ParseMessageError};
