//! Publishes a timestamped, UUID-tagged message to Kafka on a fixed interval.
//!
//! Settings come from `config/default.toml` and `GENERATOR__*` environment
//! variables. Press Ctrl-C to stop; buffered messages are flushed on exit.

use kafka_topic_generator::{load_config, KafkaPublisher, PeriodicEmitter, Scheduler};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_config()?;
    info!(
        "Starting generator on channel '{}' (topic: {}, every {:?})",
        settings.emitter.channel,
        settings.kafka.topic,
        settings.emitter.interval()
    );

    let publisher = Arc::new(KafkaPublisher::new(&settings.kafka)?);
    let emitter = PeriodicEmitter::new(publisher.clone())
        .with_delivery_reports(settings.emitter.delivery_reports);

    let scheduler = Scheduler::new(settings.emitter.interval())?;
    let shutdown = scheduler.shutdown_handle();

    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        info!("Received Ctrl-C, shutting down");
        shutdown.shutdown();
    });

    let ticks = scheduler.run(|| emitter.on_tick()).await;

    info!("Flushing pending messages");
    if let Err(e) = publisher.flush(FLUSH_TIMEOUT) {
        error!("Failed to flush pending messages: {}", e);
    }

    info!("Generator stopped after emitting {} messages", ticks);
    Ok(())
}
