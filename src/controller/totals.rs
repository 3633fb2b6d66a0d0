//! Fire-and-forget fetch of the whole-database creator count.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::api::DiscoveryClient;
use crate::controller::Advisory;
use crate::model::{ScoutEvent, SearchParams};

/// Spawns one advisory request for the aggregate creator count, independent
/// of any search state. Emits [`ScoutEvent::TotalsUpdated`] on success; on
/// failure the displayed value is simply left unchanged and no event is sent.
pub fn spawn(
    client: Arc<DiscoveryClient>,
    event_tx: UnboundedSender<ScoutEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        // Smallest page the API accepts; only db_total is consumed.
        let params = SearchParams {
            page: Some(0),
            page_size: Some(1),
            ..SearchParams::default()
        };
        let fetched = Advisory::capture("database totals", client.database(&params).await);
        if let Some(result) = fetched.value() {
            let _ = event_tx.send(ScoutEvent::TotalsUpdated {
                db_total: result.db_total,
            });
        }
    })
}
