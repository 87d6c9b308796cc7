//! Busy-time aggregation across connected calendar accounts.
//!
//! Calendar-provider integrations sit behind the [`BusySource`] port; the
//! aggregator only needs "busy intervals for account X in `[a, b)`". Fetched
//! intervals are merged per account, then combined across accounts under a
//! [`ConditionRelation`] into one disjoint group-level busy list, ready to
//! subtract from candidate slots.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::interval::{intersect_lists, merge, Interval};

/// A busy interval reported for one account. Lives for a single evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusySlot {
    pub account_id: String,
    pub interval: Interval,
}

/// How per-account busy time combines into group busy time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionRelation {
    /// Busy only where *every* account is busy -- finds time when the whole
    /// group conflicts.
    All,
    /// Busy where *any* account is busy -- avoids every participant's
    /// conflicts.
    Any,
}

/// Port for calendar-provider busy lookups.
///
/// Implemented by Google/Office365/CalDAV-style connectors outside this
/// crate. Implementations are expected to be cheap to call per account per
/// evaluation; the aggregator does no caching.
#[async_trait]
pub trait BusySource: Send + Sync {
    /// Busy intervals for one account inside `window`.
    async fn busy_intervals(
        &self,
        account_id: &str,
        window: &Interval,
    ) -> Result<Vec<Interval>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Fetch and combine busy time for a set of accounts.
///
/// An account whose fetch fails or returns nothing contributes zero busy
/// intervals -- missing provider data is steady state, not an error. Under
/// [`ConditionRelation::All`] that collapses the whole result to empty, since
/// an account with no busy time is never part of a group-wide conflict.
pub async fn merged_busy(
    source: &dyn BusySource,
    accounts: &[String],
    relation: ConditionRelation,
    window: &Interval,
) -> Vec<Interval> {
    let mut per_account: Vec<Vec<Interval>> = Vec::with_capacity(accounts.len());

    for account_id in accounts {
        let fetched = match source.busy_intervals(account_id, window).await {
            Ok(intervals) => intervals,
            Err(err) => {
                warn!(%account_id, error = %err, "busy fetch failed, treating as no busy time");
                Vec::new()
            }
        };

        // Clamp to the requested window before merging.
        let clamped = fetched
            .iter()
            .filter_map(|iv| iv.intersect(window))
            .collect();
        per_account.push(merge(clamped));
    }

    combine(per_account, relation)
}

/// Combine already-fetched busy slots, grouping by account first.
///
/// Pure counterpart of [`merged_busy`] for callers that hold the provider
/// data themselves.
pub fn merge_busy_slots(slots: &[BusySlot], relation: ConditionRelation) -> Vec<Interval> {
    let mut grouped: HashMap<&str, Vec<Interval>> = HashMap::new();
    for slot in slots {
        grouped
            .entry(slot.account_id.as_str())
            .or_default()
            .push(slot.interval);
    }

    // Deterministic account order keeps the fold stable.
    let mut accounts: Vec<_> = grouped.into_iter().collect();
    accounts.sort_by(|a, b| a.0.cmp(b.0));

    combine(
        accounts.into_iter().map(|(_, ivs)| merge(ivs)).collect(),
        relation,
    )
}

fn combine(per_account: Vec<Vec<Interval>>, relation: ConditionRelation) -> Vec<Interval> {
    match relation {
        ConditionRelation::Any => merge(per_account.into_iter().flatten().collect()),
        ConditionRelation::All => {
            let mut iter = per_account.into_iter();
            let Some(mut acc) = iter.next() else {
                return Vec::new();
            };
            for list in iter {
                acc = intersect_lists(&acc, &list);
                if acc.is_empty() {
                    break;
                }
            }
            acc
        }
    }
}
