//! Two-step campaign assignment: select a creator, choose a campaign, commit.

use std::sync::Arc;

use tracing::info;

use crate::api::DiscoveryClient;
use crate::controller::{Advisory, RetryPolicy};
use crate::model::{Campaign, Creator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignPhase {
    #[default]
    Closed,
    /// Chooser is open with a target creator and a (possibly empty) campaign list.
    Choosing,
    /// Commit request in flight.
    Committing,
}

/// Result of a confirm call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// Creator added; workflow closed.
    Committed,
    /// Commit rejected; message for the operator, workflow still open.
    Failed(String),
    /// Precondition missing (creator never persisted); nothing happened.
    Ignored,
}

/// Interactive workflow assigning one creator to one campaign.
///
/// `closed → choosing` on open, `choosing → closed` on cancel or successful
/// commit, `choosing → choosing` on commit failure so the operator can retry
/// or cancel.
pub struct CampaignAssignment {
    client: Arc<DiscoveryClient>,
    phase: AssignPhase,
    target: Option<Creator>,
    campaigns: Vec<Campaign>,
}

impl CampaignAssignment {
    /// Commit failures keep the chooser open with the target retained.
    pub const RETRY_POLICY: RetryPolicy = RetryPolicy::RetryInPlace;

    pub fn new(client: Arc<DiscoveryClient>) -> Self {
        Self {
            client,
            phase: AssignPhase::Closed,
            target: None,
            campaigns: Vec::new(),
        }
    }

    pub fn phase(&self) -> AssignPhase {
        self.phase
    }

    pub fn target(&self) -> Option<&Creator> {
        self.target.as_ref()
    }

    pub fn campaigns(&self) -> &[Campaign] {
        &self.campaigns
    }

    /// Opens the chooser for `creator`. The campaign list is an advisory
    /// fetch: on failure the chooser opens with an empty list rather than
    /// blocking the workflow.
    pub async fn open(&mut self, creator: Creator) {
        self.target = Some(creator);
        self.campaigns =
            Advisory::capture("campaign list", self.client.list_campaigns().await)
                .unwrap_or_default();
        self.phase = AssignPhase::Choosing;
    }

    /// Commits the assignment of the target creator to `campaign_id`.
    ///
    /// A creator that has never been persisted has no numeric id and cannot
    /// be assigned; the call is then a validation no-op with no network
    /// traffic. On failure the workflow stays in `Choosing` per
    /// [`Self::RETRY_POLICY`], with the target retained for retry.
    pub async fn confirm(&mut self, campaign_id: i64, notes: Option<&str>) -> AssignOutcome {
        let Some(creator_id) = self.target.as_ref().and_then(|c| c.id) else {
            return AssignOutcome::Ignored;
        };

        self.phase = AssignPhase::Committing;
        match self.client.add_creator(campaign_id, creator_id, notes).await {
            Ok(()) => {
                info!(creator_id, campaign_id, "creator added to campaign");
                self.close();
                AssignOutcome::Committed
            }
            Err(e) => {
                self.phase = AssignPhase::Choosing;
                AssignOutcome::Failed(e.message())
            }
        }
    }

    /// Discards the target and campaign list and closes the chooser.
    pub fn cancel(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.phase = AssignPhase::Closed;
        self.target = None;
        self.campaigns.clear();
    }
}
