//! Core error types for confab-core.

use thiserror::Error;

/// Terminal outcome errors for a queued status update.
///
/// `Superseded` and `Aborted` are synthesized locally by the queue and never
/// correspond to an external call; only a genuine call attempt can produce
/// `Upstream`, which carries the external error through unmodified for
/// caller-level retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    /// A newer intent replaced this one while it was still queued.
    #[error("superseded by a newer update for the same resource")]
    Superseded,

    /// The cancel token fired before dispatch, or the request was flagged
    /// aborted while its external call was in flight.
    #[error("update aborted")]
    Aborted,

    /// The external write call itself failed.
    #[error("external write failed: {0}")]
    Upstream(String),
}
