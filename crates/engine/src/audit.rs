//! Append-only audit log.
//!
//! Writes are fire-and-forget: a failed append is traced and swallowed so
//! the sink can never fail the operation that produced the entry.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseConnection, entity::prelude::*};
use uuid::Uuid;

/// Actor id recorded for engine-initiated actions.
pub const SYSTEM_ACTOR: &str = "SYSTEM";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuditAction {
    GenerateContributions,
    PaymentApprove,
    PaymentReject,
    UpdateScore,
    SendReminder,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GenerateContributions => "GENERATE_CONTRIBUTIONS",
            Self::PaymentApprove => "PAYMENT_APPROVE",
            Self::PaymentReject => "PAYMENT_REJECT",
            Self::UpdateScore => "UPDATE_SCORE",
            Self::SendReminder => "SEND_REMINDER",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub actor_id: String,
    pub action: String,
    pub target_resource: String,
    pub target_id: Option<String>,
    pub details: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Appends one audit entry, swallowing any store error.
pub(crate) async fn record(
    db: &DatabaseConnection,
    actor_id: &str,
    action: AuditAction,
    target_resource: &str,
    target_id: Option<&str>,
    details: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
) {
    let entry = ActiveModel {
        id: ActiveValue::Set(Uuid::new_v4().to_string()),
        actor_id: ActiveValue::Set(actor_id.to_string()),
        action: ActiveValue::Set(action.as_str().to_string()),
        target_resource: ActiveValue::Set(target_resource.to_string()),
        target_id: ActiveValue::Set(target_id.map(ToString::to_string)),
        details: ActiveValue::Set(details.map(|d| d.to_string())),
        created_at: ActiveValue::Set(created_at),
    };
    if let Err(err) = entry.insert(db).await {
        tracing::warn!("audit append failed for {}: {err}", action.as_str());
    }
}
