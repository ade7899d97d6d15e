//! Contribution obligations.
//!
//! A `Contribution` is one member's dues for one billing period. The
//! natural key `(user_id, month, year)` is unique, enforced by a store
//! index so concurrent generator runs cannot double-bill.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributionStatus {
    Pending,
    Paid,
    Late,
    Waived,
}

impl ContributionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Late => "Late",
            Self::Waived => "Waived",
        }
    }
}

impl TryFrom<&str> for ContributionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Late" => Ok(Self::Late),
            "Waived" => Ok(Self::Waived),
            other => Err(EngineError::Validation(format!(
                "invalid contribution status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: Uuid,
    pub user_id: String,
    pub month: u32,
    pub year: i32,
    pub amount_due_minor: i64,
    pub amount_paid_minor: i64,
    pub status: ContributionStatus,
    pub due_date: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contribution {
    /// A fresh Pending obligation for one member and period.
    pub fn new(
        user_id: String,
        month: u32,
        year: i32,
        amount_due_minor: i64,
        due_date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::Validation(format!(
                "month must be within 1..=12, got {month}"
            )));
        }
        if amount_due_minor <= 0 {
            return Err(EngineError::Validation(
                "amount_due_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            month,
            year,
            amount_due_minor,
            amount_paid_minor: 0,
            status: ContributionStatus::Pending,
            due_date,
            paid_at: None,
            created_at,
            updated_at: created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "contributions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub month: i32,
    pub year: i32,
    pub amount_due_minor: i64,
    pub amount_paid_minor: i64,
    pub status: String,
    pub due_date: DateTimeUtc,
    pub paid_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Contribution> for ActiveModel {
    fn from(contribution: &Contribution) -> Self {
        Self {
            id: ActiveValue::Set(contribution.id.to_string()),
            user_id: ActiveValue::Set(contribution.user_id.clone()),
            month: ActiveValue::Set(contribution.month as i32),
            year: ActiveValue::Set(contribution.year),
            amount_due_minor: ActiveValue::Set(contribution.amount_due_minor),
            amount_paid_minor: ActiveValue::Set(contribution.amount_paid_minor),
            status: ActiveValue::Set(contribution.status.as_str().to_string()),
            due_date: ActiveValue::Set(contribution.due_date),
            paid_at: ActiveValue::Set(contribution.paid_at),
            created_at: ActiveValue::Set(contribution.created_at),
            updated_at: ActiveValue::Set(contribution.updated_at),
        }
    }
}

impl TryFrom<Model> for Contribution {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::InvalidReference("invalid contribution id".to_string()))?,
            user_id: model.user_id,
            month: u32::try_from(model.month)
                .map_err(|_| EngineError::Validation("invalid month".to_string()))?,
            year: model.year,
            amount_due_minor: model.amount_due_minor,
            amount_paid_minor: model.amount_paid_minor,
            status: ContributionStatus::try_from(model.status.as_str())?,
            due_date: model.due_date,
            paid_at: model.paid_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
