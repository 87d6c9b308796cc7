//! # Confab Core Library
//!
//! This library provides the core engine for Confab: finding a meeting time
//! that satisfies every party's recurring weekly availability while excluding
//! time already occupied on their connected calendars. It is a library-level
//! engine invoked by surrounding application code -- UI, routing, persistence,
//! notifications, and calendar-provider protocol clients all live outside.
//!
//! ## Architecture
//!
//! - **Interval Algebra**: half-open `[start, end)` interval primitives that
//!   everything else is built on
//! - **Availability Model**: timezone-aware weekly templates converted to
//!   concrete UTC intervals per date
//! - **Busy Aggregator**: merges busy time fetched from N calendar accounts
//!   under an all-busy or any-busy relation
//! - **Slot Generator**: exhaustive or anchored tiling of a window into
//!   fixed-duration candidate slots
//! - **Availability Evaluator**: classifies each candidate slot per
//!   participant into none/some/most/all available
//! - **Update Queue**: per-resource coalescing queue that serializes RSVP
//!   status writes against the external calendar API
//!
//! ## Key Components
//!
//! - [`Interval`]: half-open time interval on the UTC axis
//! - [`AvailabilityBlock`]: an account's recurring availability template
//! - [`BusySource`]: port implemented by calendar-provider connectors
//! - [`SlotCandidate`]: a classified candidate slot with per-participant detail
//! - [`UpdateQueue`]: coalescing status-update queue

pub mod availability;
pub mod busy;
pub mod error;
pub mod evaluate;
pub mod interval;
pub mod queue;
pub mod slots;

pub use availability::{is_inside_availability, AvailabilityBlock, TimeRange, WeeklyAvailability};
pub use busy::{merge_busy_slots, merged_busy, BusySlot, BusySource, ConditionRelation};
pub use error::UpdateError;
pub use evaluate::{
    evaluate_slot, evaluate_slots, Classification, Participant, ParticipantAvailability,
    SlotCandidate,
};
pub use interval::{intersect_lists, merge, Interval};
pub use queue::{
    CancelToken, ResourceKey, RsvpStatus, StatusWriter, UpdateHandle, UpdatePayload, UpdateQueue,
    UpdateQueueConfig,
};
pub use slots::{anchored_day_slots, tile_range};
