//! Stateful workflow controllers.
//!
//! Each workflow models its lifecycle as an explicit state machine held in a
//! single owned value; transitions are plain methods, side effects go through
//! the API client and the event channel.

pub mod assign;
pub mod reset;
pub mod search;
pub mod totals;

use std::fmt::Display;

use tracing::debug;

/// What a workflow does when its commit operation fails.
///
/// The two confirmation workflows deliberately differ: campaign assignment
/// stays open for retry, seen-history reset always closes because the action
/// is idempotent and safe to re-trigger from scratch. Encoding the policy as
/// data keeps the asymmetry intentional and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Keep the workflow open with its state intact so the operator can retry.
    RetryInPlace,
    /// Close the workflow; re-triggering starts over.
    CloseOnFailure,
}

/// Outcome of a background fetch whose failure must never surface to the
/// operator or block a primary workflow. Failures are logged at debug and
/// collapse to `None`; callers acknowledge the fallibility by unwrapping
/// with a fallback.
#[derive(Debug)]
pub struct Advisory<T>(Option<T>);

impl<T> Advisory<T> {
    pub fn capture<E: Display>(what: &'static str, result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Advisory(Some(value)),
            Err(e) => {
                debug!(error = %e, "advisory fetch failed: {what}");
                Advisory(None)
            }
        }
    }

    pub fn value(self) -> Option<T> {
        self.0
    }

    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        self.0.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisory_failure_collapses_to_fallback() {
        let advisory: Advisory<Vec<u32>> = Advisory::capture("test", Err("boom"));
        assert!(advisory.value().is_none());

        let advisory: Advisory<Vec<u32>> = Advisory::capture("test", Err("boom"));
        assert!(advisory.unwrap_or_default().is_empty());
    }

    #[test]
    fn advisory_success_passes_through() {
        let advisory = Advisory::capture("test", Ok::<_, String>(vec![1, 2]));
        assert_eq!(advisory.value(), Some(vec![1, 2]));
    }
}
