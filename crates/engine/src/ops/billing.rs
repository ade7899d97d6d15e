use chrono::{DateTime, Datelike, Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, sea_query::Expr};
use serde_json::json;

use crate::{
    EngineError, ResultEngine,
    audit::{self, AuditAction},
    contributions::{self, Contribution, ContributionStatus},
    users::{self, Role},
};

use super::Engine;

/// One billing period: a calendar month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BillingPeriod {
    pub month: u32,
    pub year: i32,
}

impl BillingPeriod {
    /// The period containing `at`.
    #[must_use]
    pub fn containing(at: DateTime<Utc>) -> Self {
        Self {
            month: at.month(),
            year: at.year(),
        }
    }
}

impl Engine {
    /// Creates one Pending contribution per active baseline member for the
    /// period, skipping members already billed for it.
    ///
    /// Best-effort batch: a failed insert is logged and skipped rather than
    /// aborting the run, and the unique `(user_id, month, year)` index turns
    /// a concurrent duplicate into a skipped insert. Returns the number of
    /// contributions created and appends one audit entry for the batch.
    pub async fn generate_contributions(
        &self,
        actor_id: &str,
        period: BillingPeriod,
        now: DateTime<Utc>,
    ) -> ResultEngine<u32> {
        if !(1..=12).contains(&period.month) {
            return Err(EngineError::Validation(format!(
                "month must be within 1..=12, got {}",
                period.month
            )));
        }

        let due_date = now + Duration::days(self.policy.grace_days);
        let members: Vec<users::Model> = users::Entity::find()
            .filter(users::Column::IsActive.eq(true))
            .filter(users::Column::Role.eq(Role::Member.as_str()))
            .all(&self.database)
            .await?;

        let mut generated = 0u32;
        for member in members {
            let existing = contributions::Entity::find()
                .filter(contributions::Column::UserId.eq(member.id.clone()))
                .filter(contributions::Column::Month.eq(period.month as i32))
                .filter(contributions::Column::Year.eq(period.year))
                .one(&self.database)
                .await?;
            if existing.is_some() {
                continue;
            }

            let contribution = match Contribution::new(
                member.id.clone(),
                period.month,
                period.year,
                self.policy.amount_due_minor,
                due_date,
                now,
            ) {
                Ok(contribution) => contribution,
                Err(err) => {
                    tracing::warn!("skipping contribution for {}: {err}", member.id);
                    continue;
                }
            };

            match contributions::ActiveModel::from(&contribution)
                .insert(&self.database)
                .await
            {
                Ok(_) => generated += 1,
                Err(err) => {
                    tracing::warn!("skipping contribution for {}: {err}", member.id);
                }
            }
        }

        audit::record(
            &self.database,
            actor_id,
            AuditAction::GenerateContributions,
            "contributions",
            None,
            Some(json!({
                "month": period.month,
                "year": period.year,
                "generated": generated,
            })),
            now,
        )
        .await;

        Ok(generated)
    }

    /// Reclassifies every Pending contribution past its due date as Late.
    ///
    /// Single set-based update, safe to run arbitrarily often. Paid and
    /// Waived rows are never touched, and no audit entry is written: the
    /// status is a risk classification, not a financial event.
    pub async fn sweep_late(&self, now: DateTime<Utc>) -> ResultEngine<u64> {
        let result = contributions::Entity::update_many()
            .col_expr(
                contributions::Column::Status,
                Expr::value(ContributionStatus::Late.as_str()),
            )
            .col_expr(contributions::Column::UpdatedAt, Expr::value(now))
            .filter(contributions::Column::Status.eq(ContributionStatus::Pending.as_str()))
            .filter(contributions::Column::DueDate.lt(now))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }
}
