//! The outbound channel abstraction the emitter publishes through.

use crate::error::Result;
use std::future::Future;
use std::pin::Pin;

/// Outcome of a submitted payload, resolved once the transport knows it.
///
/// Dropping a `Delivery` does not cancel the send: implementations enqueue
/// the payload before returning it.
pub type Delivery = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// A publishing channel bound to a single topic.
pub trait Publisher: Send + Sync {
    /// Submits a payload for asynchronous publication.
    fn submit(&self, payload: String) -> Delivery;

    /// Submits a payload with an optional record key.
    ///
    /// Channels without a notion of keys ignore it.
    fn submit_with_key(&self, payload: String, key: Option<String>) -> Delivery {
        let _ = key;
        self.submit(payload)
    }
}
