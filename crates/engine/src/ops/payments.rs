use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait, sea_query::Expr,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    audit::{self, AuditAction},
    commands::{DecisionOutcome, PaymentClaim},
    contributions::{self, ContributionStatus},
    scoring,
    transactions::{self, Transaction, TransactionStatus},
    users,
};

use super::{Engine, with_tx};

/// Outcome of [`Engine::decide_payment`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaymentDecision {
    pub transaction_status: TransactionStatus,
    pub contribution_updated: bool,
    pub points_added: Option<i64>,
}

impl Engine {
    /// Records a member's payment claim.
    ///
    /// `user_id` is forced to the authenticated submitter and the stored
    /// status is always Pending, whatever the claim carries. Amount
    /// plausibility, duplicate detection and proof checks belong to the
    /// human reviewer.
    pub async fn submit_payment(
        &self,
        submitter_id: &str,
        claim: PaymentClaim,
        now: DateTime<Utc>,
    ) -> ResultEngine<Transaction> {
        if claim.amount_minor <= 0 {
            return Err(EngineError::Validation(
                "amount_minor must be > 0".to_string(),
            ));
        }

        let tx = Transaction {
            id: Uuid::new_v4(),
            user_id: submitter_id.to_string(),
            contribution_id: claim.contribution_id,
            amount_minor: claim.amount_minor,
            payment_method: claim.payment_method,
            reference_number: claim.reference_number,
            proof_url: claim.proof_url,
            status: TransactionStatus::Pending,
            remarks: claim.remarks,
            verified_by: None,
            created_at: now,
            verified_at: None,
        };
        transactions::ActiveModel::from(&tx)
            .insert(&self.database)
            .await?;
        Ok(tx)
    }

    /// Applies a reviewer's decision to a pending claim.
    ///
    /// A claim is decided exactly once: the status flip is a conditional
    /// update on `status = Pending`, so re-deciding (or losing a race to a
    /// concurrent reviewer) fails with `InvalidState`.
    ///
    /// On approval of a linked claim, the contribution is marked Paid, the
    /// member's score grows by the timeliness points, and both commit
    /// atomically with the claim update. A dangling or malformed
    /// `contribution_id` skips the contribution and scoring steps without
    /// failing the decision; a contribution that is already Paid or Waived
    /// refuses the whole decision before anything is written.
    pub async fn decide_payment(
        &self,
        reviewer_id: &str,
        transaction_id: Uuid,
        outcome: DecisionOutcome,
        now: DateTime<Utc>,
    ) -> ResultEngine<PaymentDecision> {
        let new_status = match outcome {
            DecisionOutcome::Approve => TransactionStatus::Verified,
            DecisionOutcome::Reject => TransactionStatus::Rejected,
        };

        let (tx_model, scored) = with_tx!(self, |db_tx| {
            let tx_model = transactions::Entity::find_by_id(transaction_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("transaction".to_string()))?;

            let current = TransactionStatus::try_from(tx_model.status.as_str())?;
            if current != TransactionStatus::Pending {
                return Err(EngineError::InvalidState(
                    "transaction already decided".to_string(),
                ));
            }

            // Resolve the linked contribution before any write, so the
            // overwrite guard can refuse the decision while it is still a
            // no-op. A malformed back-reference counts as dangling.
            let linked = if outcome == DecisionOutcome::Approve {
                match tx_model
                    .contribution_id
                    .as_deref()
                    .and_then(|raw| Uuid::parse_str(raw).ok())
                {
                    Some(contribution_id) => {
                        contributions::Entity::find_by_id(contribution_id.to_string())
                            .one(&db_tx)
                            .await?
                    }
                    None => None,
                }
            } else {
                None
            };

            if let Some(contribution) = &linked {
                let status = ContributionStatus::try_from(contribution.status.as_str())?;
                if !matches!(status, ContributionStatus::Pending | ContributionStatus::Late) {
                    return Err(EngineError::InvalidState(format!(
                        "contribution already {}",
                        status.as_str()
                    )));
                }
            }

            // First decision wins, even under concurrent reviewers.
            let flipped = transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::Status,
                    Expr::value(new_status.as_str()),
                )
                .col_expr(transactions::Column::VerifiedBy, Expr::value(reviewer_id))
                .col_expr(transactions::Column::VerifiedAt, Expr::value(now))
                .filter(transactions::Column::Id.eq(tx_model.id.clone()))
                .filter(transactions::Column::Status.eq(TransactionStatus::Pending.as_str()))
                .exec(&db_tx)
                .await?;
            if flipped.rows_affected == 0 {
                return Err(EngineError::InvalidState(
                    "transaction already decided".to_string(),
                ));
            }

            let mut scored: Option<i64> = None;
            if let Some(contribution) = linked {
                let marked = contributions::Entity::update_many()
                    .col_expr(
                        contributions::Column::Status,
                        Expr::value(ContributionStatus::Paid.as_str()),
                    )
                    .col_expr(
                        contributions::Column::AmountPaidMinor,
                        Expr::value(tx_model.amount_minor),
                    )
                    .col_expr(contributions::Column::PaidAt, Expr::value(now))
                    .col_expr(contributions::Column::UpdatedAt, Expr::value(now))
                    .filter(contributions::Column::Id.eq(contribution.id.clone()))
                    .filter(contributions::Column::Status.is_in([
                        ContributionStatus::Pending.as_str(),
                        ContributionStatus::Late.as_str(),
                    ]))
                    .exec(&db_tx)
                    .await?;

                // A concurrent decision may have marked it Paid between the
                // read and the write; the score must not be applied twice.
                if marked.rows_affected > 0 {
                    let points = scoring::payment_points(now, contribution.due_date);
                    users::Entity::update_many()
                        .col_expr(
                            users::Column::ContributionScore,
                            Expr::col(users::Column::ContributionScore).add(points),
                        )
                        .filter(users::Column::Id.eq(tx_model.user_id.clone()))
                        .exec(&db_tx)
                        .await?;
                    scored = Some(points);
                }
            }

            Ok::<_, EngineError>((tx_model, scored))
        })?;

        let action = match outcome {
            DecisionOutcome::Approve => AuditAction::PaymentApprove,
            DecisionOutcome::Reject => AuditAction::PaymentReject,
        };
        audit::record(
            &self.database,
            reviewer_id,
            action,
            "transactions",
            Some(&tx_model.id),
            Some(json!({
                "amount_minor": tx_model.amount_minor,
                "payment_method": tx_model.payment_method,
            })),
            now,
        )
        .await;

        if let Some(points) = scored {
            audit::record(
                &self.database,
                reviewer_id,
                AuditAction::UpdateScore,
                "users",
                Some(&tx_model.user_id),
                Some(json!({
                    "points_added": points,
                    "reason": "Payment Verified",
                })),
                now,
            )
            .await;
        }

        Ok(PaymentDecision {
            transaction_status: new_status,
            contribution_updated: scored.is_some(),
            points_added: scored,
        })
    }
}
