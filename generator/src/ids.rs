//! Identifier generation for outbound messages.

use uuid::Uuid;

/// Produces the identifier attached to each message.
pub trait IdGenerator: Send + Sync {
    /// Returns the identifier for the next message.
    fn next_id(&self) -> Uuid;
}

/// Random version 4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Always returns the same identifier.
#[derive(Debug, Clone, Copy)]
pub struct FixedIds(pub Uuid);

impl IdGenerator for FixedIds {
    fn next_id(&self) -> Uuid {
        self.0
    }
}
