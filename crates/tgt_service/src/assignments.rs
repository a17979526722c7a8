use anyhow::{Context, Result};
use serde::Serialize;
use tgt_core::workflow::IE_LOCKOUT_STATUSES;
use tracing::info;

use crate::TgService;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IeUpdateSummary {
    pub tgs_processed: usize,
    pub users_updated: u64,
}

impl TgService {
    /// Sets every IE assignment to inactive on TGs in LE Checking or LE Signed Off.
    pub async fn deactivate_interested_experts(&self) -> Result<IeUpdateSummary> {
        info!("IE status updater started");

        let ids = self
            .store
            .find_tg_ids_by_status(&IE_LOCKOUT_STATUSES)
            .await
            .context("Failed to find TGs in LEC or LES status")?;

        if ids.is_empty() {
            info!("No TGs in LEC or LES status");
            return Ok(IeUpdateSummary::default());
        }

        info!(count = ids.len(), "found TGs in LEC/LES status");

        let users_updated = self
            .store
            .deactivate_ie_users(&ids)
            .await
            .context("Failed to deactivate IE users")?;

        info!(users_updated, "IE users set to inactive");

        Ok(IeUpdateSummary {
            tgs_processed: ids.len(),
            users_updated,
        })
    }
}
