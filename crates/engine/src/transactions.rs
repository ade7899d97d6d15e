//! Payment claims.
//!
//! A `Transaction` records a member's claim of having paid, optionally
//! linked to one contribution. It stays Pending until a reviewer verifies
//! or rejects it; both outcomes are terminal.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    BankTransfer,
    Cash,
    Online,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BankTransfer => "Bank Transfer",
            Self::Cash => "Cash",
            Self::Online => "Online",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Bank Transfer" => Ok(Self::BankTransfer),
            "Cash" => Ok(Self::Cash),
            "Online" => Ok(Self::Online),
            other => Err(EngineError::Validation(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Pending,
    Verified,
    Rejected,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Verified => "Verified",
            Self::Rejected => "Rejected",
        }
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Verified" => Ok(Self::Verified),
            "Rejected" => Ok(Self::Rejected),
            other => Err(EngineError::Validation(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub contribution_id: Option<Uuid>,
    pub amount_minor: i64,
    pub payment_method: PaymentMethod,
    pub reference_number: Option<String>,
    pub proof_url: Option<String>,
    pub status: TransactionStatus,
    pub remarks: Option<String>,
    pub verified_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub contribution_id: Option<String>,
    pub amount_minor: i64,
    pub payment_method: String,
    pub reference_number: Option<String>,
    pub proof_url: Option<String>,
    pub status: String,
    pub remarks: Option<String>,
    pub verified_by: Option<String>,
    pub created_at: DateTimeUtc,
    pub verified_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            contribution_id: ActiveValue::Set(tx.contribution_id.map(|id| id.to_string())),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            payment_method: ActiveValue::Set(tx.payment_method.as_str().to_string()),
            reference_number: ActiveValue::Set(tx.reference_number.clone()),
            proof_url: ActiveValue::Set(tx.proof_url.clone()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            remarks: ActiveValue::Set(tx.remarks.clone()),
            verified_by: ActiveValue::Set(tx.verified_by.clone()),
            created_at: ActiveValue::Set(tx.created_at),
            verified_at: ActiveValue::Set(tx.verified_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidReference("invalid transaction id".to_string()))?,
            user_id: model.user_id,
            // A malformed back-reference is dropped, matching the dangling
            // link tolerance in verification.
            contribution_id: model
                .contribution_id
                .and_then(|s| Uuid::parse_str(&s).ok()),
            amount_minor: model.amount_minor,
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
            reference_number: model.reference_number,
            proof_url: model.proof_url,
            status: TransactionStatus::try_from(model.status.as_str())?,
            remarks: model.remarks,
            verified_by: model.verified_by,
            created_at: model.created_at,
            verified_at: model.verified_at,
        })
    }
}
