//! Guarded destructive reset of the server-side seen history.

use std::sync::Arc;

use tracing::info;

use crate::api::DiscoveryClient;
use crate::controller::RetryPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetGate {
    #[default]
    Idle,
    /// Waiting for explicit operator confirmation.
    Confirming,
}

/// Outcome of a committed reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    /// History cleared; optional status message from the API.
    Done(Option<String>),
    /// Reset rejected; message for the operator. The gate is closed either way.
    Failed(String),
    /// Commit called without the gate open; nothing happened.
    Ignored,
}

/// Two-state confirmation gate in front of the reset operation.
///
/// Single-shot: unlike campaign assignment, a failed commit does not hold
/// the gate open — the action is idempotent and safe to re-trigger from
/// scratch.
pub struct SeenHistoryReset {
    client: Arc<DiscoveryClient>,
    gate: ResetGate,
}

impl SeenHistoryReset {
    pub const RETRY_POLICY: RetryPolicy = RetryPolicy::CloseOnFailure;

    pub fn new(client: Arc<DiscoveryClient>) -> Self {
        Self {
            client,
            gate: ResetGate::Idle,
        }
    }

    pub fn gate(&self) -> ResetGate {
        self.gate
    }

    /// Opens the confirmation gate. Requires a further explicit
    /// [`Self::commit`] before anything destructive happens.
    pub fn open(&mut self) {
        self.gate = ResetGate::Confirming;
    }

    pub fn cancel(&mut self) {
        self.gate = ResetGate::Idle;
    }

    /// Invokes the reset. The gate returns to `Idle` on both success and
    /// failure per [`Self::RETRY_POLICY`].
    pub async fn commit(&mut self) -> ResetOutcome {
        if self.gate != ResetGate::Confirming {
            return ResetOutcome::Ignored;
        }
        let result = self.client.reset_seen().await;
        self.gate = ResetGate::Idle;
        match result {
            Ok(response) => {
                info!(status = %response.status, "seen history reset");
                ResetOutcome::Done(response.message)
            }
            Err(e) => ResetOutcome::Failed(e.message()),
        }
    }
}
