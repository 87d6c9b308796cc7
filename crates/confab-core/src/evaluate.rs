//! Per-slot, per-participant availability evaluation.
//!
//! Combines candidate slots, each participant's weekly template, and their
//! merged busy time into classified [`SlotCandidate`]s. Per-participant
//! detail is preserved so callers can render who is free in every slot.

use serde::{Deserialize, Serialize};

use crate::availability::{is_inside_availability, AvailabilityBlock};
use crate::interval::Interval;

/// How much of the participant set can make a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    NoneAvailable,
    SomeAvailable,
    MostAvailable,
    AllAvailable,
}

impl Classification {
    /// Classify `available` free participants out of `total`.
    ///
    /// The "most" threshold is `available >= total / 2` with real-valued
    /// division, kept exactly as `2 * available >= total` in integers:
    /// 2 of 4 is Most, 1 of 3 is Some.
    pub fn from_counts(available: usize, total: usize) -> Self {
        if available == 0 {
            Self::NoneAvailable
        } else if available == total {
            Self::AllAvailable
        } else if 2 * available >= total {
            Self::MostAvailable
        } else {
            Self::SomeAvailable
        }
    }
}

/// One participant's verdict for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantAvailability {
    pub participant_id: String,
    pub available: bool,
}

/// A candidate slot with its classification and per-participant detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCandidate {
    pub interval: Interval,
    pub classification: Classification,
    pub participants: Vec<ParticipantAvailability>,
}

/// Evaluation input for one participant.
#[derive(Debug, Clone)]
pub struct Participant {
    pub id: String,
    pub availability: AvailabilityBlock,
    /// Merged, disjoint busy intervals for the evaluation window, as
    /// produced by the busy aggregator.
    pub busy: Vec<Interval>,
}

impl Participant {
    /// A participant is free for a slot when the slot sits inside their
    /// weekly template and touches none of their busy time.
    fn available_for(&self, slot: &Interval) -> bool {
        let busy = self.busy.iter().any(|iv| iv.overlaps(slot));
        !busy && is_inside_availability(slot, &self.availability)
    }
}

/// Evaluate one candidate slot against every participant.
pub fn evaluate_slot(slot: &Interval, participants: &[Participant]) -> SlotCandidate {
    let per_participant: Vec<ParticipantAvailability> = participants
        .iter()
        .map(|p| ParticipantAvailability {
            participant_id: p.id.clone(),
            available: p.available_for(slot),
        })
        .collect();

    let available = per_participant.iter().filter(|p| p.available).count();

    SlotCandidate {
        interval: *slot,
        classification: Classification::from_counts(available, participants.len()),
        participants: per_participant,
    }
}

/// Evaluate a whole candidate set, preserving slot order.
pub fn evaluate_slots(slots: &[Interval], participants: &[Participant]) -> Vec<SlotCandidate> {
    slots
        .iter()
        .map(|slot| evaluate_slot(slot, participants))
        .collect()
}
