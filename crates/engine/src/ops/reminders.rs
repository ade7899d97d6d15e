use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

use crate::{
    ResultEngine,
    audit::{self, AuditAction, SYSTEM_ACTOR},
    contributions::{self, ContributionStatus},
};

use super::Engine;

impl Engine {
    /// Issues a dues reminder for every Pending or Late contribution.
    ///
    /// Delivery is simulated: each reminder is traced and recorded in the
    /// audit log under the `SYSTEM` actor. Returns the number issued.
    pub async fn send_reminders(&self, now: DateTime<Utc>) -> ResultEngine<u64> {
        let open = contributions::Entity::find()
            .filter(contributions::Column::Status.is_in([
                ContributionStatus::Pending.as_str(),
                ContributionStatus::Late.as_str(),
            ]))
            .all(&self.database)
            .await?;

        let mut sent = 0u64;
        for due in open {
            let message = format!(
                "reminder to user {}: {} contribution of {} minor units",
                due.user_id, due.status, due.amount_due_minor
            );
            tracing::info!("{message}");
            audit::record(
                &self.database,
                SYSTEM_ACTOR,
                AuditAction::SendReminder,
                "notifications",
                Some(&due.user_id),
                Some(json!({"message": message, "type": "email"})),
                now,
            )
            .await;
            sent += 1;
        }
        Ok(sent)
    }
}
