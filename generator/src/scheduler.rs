//! Fixed-period tick scheduler with graceful shutdown.

use crate::error::{GeneratorError, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{error, info};

/// Invokes a callback once per period until shut down.
///
/// The first tick fires one full period after `run` starts. If a tick is
/// late, missed ticks are skipped rather than fired in a burst, so ticks never
/// overlap. A panicking callback is logged and the next tick still fires.
///
/// # Example
///
/// ```
/// use kafka_topic_generator::Scheduler;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let scheduler = Scheduler::new(Duration::from_millis(10))?;
/// let handle = scheduler.shutdown_handle();
///
/// let mut seen = 0;
/// let ticks = scheduler
///     .run(|| {
///         seen += 1;
///         if seen == 3 {
///             handle.shutdown();
///         }
///     })
///     .await;
/// assert_eq!(ticks, 3);
/// # Ok(())
/// # }
/// ```
pub struct Scheduler {
    period: Duration,
    shutdown: Arc<watch::Sender<bool>>,
}

impl Scheduler {
    /// Creates a scheduler with a fixed period.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidPeriod`] if `period` is zero or too
    /// large to schedule from the current instant.
    pub fn new(period: Duration) -> Result<Self> {
        if period.is_zero() || std::time::Instant::now().checked_add(period).is_none() {
            return Err(GeneratorError::InvalidPeriod);
        }

        let (shutdown, _) = watch::channel(false);
        Ok(Self {
            period,
            shutdown: Arc::new(shutdown),
        })
    }

    /// The time between ticks.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns a handle that stops `run` from another task.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            shutdown: Arc::clone(&self.shutdown),
        }
    }

    /// Ticks until shutdown is requested, returning the number of ticks fired.
    pub async fn run<F>(&self, mut on_tick: F) -> u64
    where
        F: FnMut(),
    {
        let mut shutdown = self.shutdown.subscribe();
        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ticks = 0;

        info!("Starting scheduler with period {:?}", self.period);

        loop {
            let stop = *shutdown.borrow_and_update();
            if stop {
                info!("Shutdown signal received, stopping scheduler");
                break;
            }

            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    ticks += 1;
                    if panic::catch_unwind(AssertUnwindSafe(|| on_tick())).is_err() {
                        error!("Tick {} panicked, continuing with the next tick", ticks);
                    }
                }
            }
        }

        info!("Scheduler stopped after {} ticks", ticks);
        ticks
    }
}

/// Handle for stopping a running scheduler from another task.
#[derive(Clone)]
pub struct ShutdownHandle {
    shutdown: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    /// Requests shutdown. Calling it again has no further effect.
    pub fn shutdown(&self) {
        info!("Requesting scheduler shutdown");
        self.shutdown.send_replace(true);
    }
}
