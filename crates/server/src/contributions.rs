//! Contribution API endpoints

use api_types::contribution::{
    ContributionStatus as ApiStatus, ContributionView, ContributionsResponse, GenerateRequest,
    GenerateResponse,
};
use axum::{Extension, Json, extract::State};
use chrono::Utc;

use crate::{ServerError, require_admin, server::ServerState};
use engine::{BillingPeriod, ContributionStatus, users};

fn map_status(status: ContributionStatus) -> ApiStatus {
    match status {
        ContributionStatus::Pending => ApiStatus::Pending,
        ContributionStatus::Paid => ApiStatus::Paid,
        ContributionStatus::Late => ApiStatus::Late,
        ContributionStatus::Waived => ApiStatus::Waived,
    }
}

pub async fn generate(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ServerError> {
    require_admin(&user)?;

    let now = Utc::now();
    let current = BillingPeriod::containing(now);
    let period = BillingPeriod {
        month: payload.month.unwrap_or(current.month),
        year: payload.year.unwrap_or(current.year),
    };

    let generated = state
        .engine
        .generate_contributions(&user.id, period, now)
        .await?;
    Ok(Json(GenerateResponse { generated }))
}

pub async fn my_contributions(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ContributionsResponse>, ServerError> {
    let contributions = state
        .engine
        .member_contributions(&user.id)
        .await?
        .into_iter()
        .map(|c| ContributionView {
            id: c.id,
            month: c.month,
            year: c.year,
            amount_due_minor: c.amount_due_minor,
            amount_paid_minor: c.amount_paid_minor,
            status: map_status(c.status),
            due_date: c.due_date,
            paid_at: c.paid_at,
        })
        .collect();
    Ok(Json(ContributionsResponse { contributions }))
}
