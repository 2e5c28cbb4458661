//! Integration tests for the topic generator.

use chrono::{TimeZone, Utc};
use kafka_topic_generator::{
    Delivery, FixedClock, FixedIds, GeneratorError, KafkaPublisher, OutboundMessage,
    PeriodicEmitter, Publisher, Scheduler, Settings,
};
use rdkafka::ClientConfig;
use std::collections::HashSet;
use std::future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

/// Records every submitted payload and key, and reports success.
#[derive(Default)]
struct RecordingPublisher {
    records: Mutex<Vec<(Option<String>, String)>>,
}

impl RecordingPublisher {
    fn payloads(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(_, payload)| payload.clone())
            .collect()
    }

    fn keys(&self) -> Vec<Option<String>> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }
}

impl Publisher for RecordingPublisher {
    fn submit(&self, payload: String) -> Delivery {
        self.submit_with_key(payload, None)
    }

    fn submit_with_key(&self, payload: String, key: Option<String>) -> Delivery {
        self.records.lock().unwrap().push((key, payload));
        Box::pin(future::ready(Ok(())))
    }
}

/// Fails every submission, as if the broker were unreachable.
#[derive(Default)]
struct FailingPublisher {
    attempts: AtomicUsize,
}

impl Publisher for FailingPublisher {
    fn submit(&self, _payload: String) -> Delivery {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Box::pin(future::ready(Err(GeneratorError::Other(
            "broker unreachable".to_string(),
        ))))
    }
}

#[tokio::test]
async fn test_frozen_clock_and_id_produce_exact_payload() {
    let publisher = Arc::new(RecordingPublisher::default());
    let emitter = PeriodicEmitter::new(publisher.clone())
        .with_clock(Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )))
        .with_id_generator(Arc::new(FixedIds(
            Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap(),
        )));

    emitter.on_tick();

    assert_eq!(
        publisher.payloads(),
        vec!["Data tanggal : 2024-01-01T00:00:00Z; id : 123e4567-e89b-12d3-a456-426614174000"]
    );
}

#[tokio::test]
async fn test_each_tick_emits_one_well_formed_message_with_a_fresh_id() {
    let publisher = Arc::new(RecordingPublisher::default());
    let emitter = PeriodicEmitter::new(publisher.clone());

    for _ in 0..50 {
        emitter.on_tick();
    }

    let payloads = publisher.payloads();
    assert_eq!(payloads.len(), 50);

    let mut ids = HashSet::new();
    for payload in &payloads {
        let message: OutboundMessage = payload.parse().unwrap();
        assert!(ids.insert(message.id), "duplicate id in '{}'", payload);
    }
}

#[tokio::test]
async fn test_emitter_submits_unkeyed_records() {
    let publisher = Arc::new(RecordingPublisher::default());
    let emitter = PeriodicEmitter::new(publisher.clone());

    emitter.on_tick();
    emitter.on_tick();

    assert_eq!(publisher.keys(), vec![None, None]);
}

#[tokio::test]
async fn test_unkeyed_publisher_falls_back_to_submit() {
    let publisher = FailingPublisher::default();

    let result = publisher
        .submit_with_key("payload".to_string(), Some("key".to_string()))
        .await;

    assert!(result.is_err());
    assert_eq!(publisher.attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_ticks_fire_once_per_period() {
    let publisher = Arc::new(RecordingPublisher::default());
    let emitter = PeriodicEmitter::new(publisher.clone());
    let scheduler = Scheduler::new(Duration::from_secs(5)).unwrap();
    let shutdown = scheduler.shutdown_handle();

    let run = tokio::spawn(async move { scheduler.run(move || emitter.on_tick()).await });

    // floor(26s / 5s) = 5
    tokio::time::sleep(Duration::from_secs(26)).await;
    shutdown.shutdown();

    assert_eq!(run.await.unwrap(), 5);
    assert_eq!(publisher.payloads().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_failed_publish_does_not_stop_next_tick() {
    let publisher = Arc::new(FailingPublisher::default());
    let emitter = PeriodicEmitter::new(publisher.clone());
    let scheduler = Scheduler::new(Duration::from_secs(5)).unwrap();
    let shutdown = scheduler.shutdown_handle();

    let run = tokio::spawn(async move { scheduler.run(move || emitter.on_tick()).await });

    tokio::time::sleep(Duration::from_secs(16)).await;
    shutdown.shutdown();

    assert_eq!(run.await.unwrap(), 3);
    assert_eq!(publisher.attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_failed_delivery_reports_do_not_stop_next_tick() {
    let publisher = Arc::new(FailingPublisher::default());
    let emitter = PeriodicEmitter::new(publisher.clone()).with_delivery_reports(true);
    let scheduler = Scheduler::new(Duration::from_secs(5)).unwrap();
    let shutdown = scheduler.shutdown_handle();

    let run = tokio::spawn(async move { scheduler.run(move || emitter.on_tick()).await });

    tokio::time::sleep(Duration::from_secs(11)).await;
    shutdown.shutdown();

    assert_eq!(run.await.unwrap(), 2);
    assert_eq!(publisher.attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_panicking_tick_does_not_stop_scheduler() {
    let scheduler = Scheduler::new(Duration::from_secs(5)).unwrap();
    let shutdown = scheduler.shutdown_handle();
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);

    let run = tokio::spawn(async move {
        scheduler
            .run(move || {
                if counted.fetch_add(1, Ordering::SeqCst) == 0 {
                    panic!("first tick fails");
                }
            })
            .await
    });

    tokio::time::sleep(Duration::from_secs(11)).await;
    shutdown.shutdown();

    assert_eq!(run.await.unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_kafka_publisher_binds_configured_topic() {
    let publisher = KafkaPublisher::new(&Settings::default().kafka).unwrap();
    assert_eq!(publisher.topic(), "mytopic");
}

#[tokio::test]
async fn test_kafka_publisher_reports_unreachable_broker() {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", "127.0.0.1:1")
        .set("message.timeout.ms", "200");
    let publisher = KafkaPublisher::from_config(config, "mytopic").unwrap();

    let delivery = publisher.submit("Data tanggal : unreachable".to_string());
    let result = tokio::time::timeout(Duration::from_secs(30), delivery)
        .await
        .expect("delivery should time out inside librdkafka first");

    assert!(result.is_err());
}

#[tokio::test]
async fn test_kafka_publisher_reports_unreachable_broker_for_keyed_records() {
    let mut config = ClientConfig::new();
    config
        .set("bootstrap.servers", "127.0.0.1:1")
        .set("message.timeout.ms", "200");
    let publisher = KafkaPublisher::from_config(config, "mytopic").unwrap();

    let delivery = publisher.submit_with_key(
        "Data tanggal : unreachable".to_string(),
        Some("partition-key".to_string()),
    );
    let result = tokio::time::timeout(Duration::from_secs(30), delivery)
        .await
        .expect("delivery should time out inside librdkafka first");

    assert!(result.is_err());
}
