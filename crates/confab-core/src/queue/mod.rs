//! Per-resource coalescing queue for RSVP status updates.
//!
//! Serializes asynchronous accept/decline writes against the external
//! calendar API so that only the most recent intent per resource is ever
//! dispatched, while stale queued or in-flight intents are deterministically
//! rejected.

pub mod cancel;
pub mod update_queue;


pub use cancel::CancelToken;
pub use update_queue::{
    ResourceKey, RsvpStatus, StatusWriter, UpdateHandle, UpdatePayload, UpdateQueue,
    UpdateQueueConfig,
};
