//! Payment claim API endpoints

use api_types::payment::{
    DecisionAction, DecisionRequest, DecisionResponse, PaymentMethod as ApiMethod, PaymentSubmit,
    TransactionStatus as ApiStatus, TransactionView, TransactionsQuery, TransactionsResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, require_admin, server::ServerState};
use engine::{DecisionOutcome, PaymentClaim, PaymentMethod, Transaction, TransactionStatus, users};

fn map_method(method: PaymentMethod) -> ApiMethod {
    match method {
        PaymentMethod::BankTransfer => ApiMethod::BankTransfer,
        PaymentMethod::Cash => ApiMethod::Cash,
        PaymentMethod::Online => ApiMethod::Online,
    }
}

fn unmap_method(method: ApiMethod) -> PaymentMethod {
    match method {
        ApiMethod::BankTransfer => PaymentMethod::BankTransfer,
        ApiMethod::Cash => PaymentMethod::Cash,
        ApiMethod::Online => PaymentMethod::Online,
    }
}

fn map_status(status: TransactionStatus) -> ApiStatus {
    match status {
        TransactionStatus::Pending => ApiStatus::Pending,
        TransactionStatus::Verified => ApiStatus::Verified,
        TransactionStatus::Rejected => ApiStatus::Rejected,
    }
}

fn unmap_status(status: ApiStatus) -> TransactionStatus {
    match status {
        ApiStatus::Pending => TransactionStatus::Pending,
        ApiStatus::Verified => TransactionStatus::Verified,
        ApiStatus::Rejected => TransactionStatus::Rejected,
    }
}

fn view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        user_id: tx.user_id,
        contribution_id: tx.contribution_id,
        amount_minor: tx.amount_minor,
        payment_method: map_method(tx.payment_method),
        reference_number: tx.reference_number,
        proof_url: tx.proof_url,
        status: map_status(tx.status),
        remarks: tx.remarks,
        verified_by: tx.verified_by,
        created_at: tx.created_at,
        verified_at: tx.verified_at,
    }
}

pub async fn submit(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PaymentSubmit>,
) -> Result<Json<TransactionView>, ServerError> {
    let mut claim = PaymentClaim::new(payload.amount_minor, unmap_method(payload.payment_method));
    claim.contribution_id = payload.contribution_id;
    claim.reference_number = payload.reference_number;
    claim.proof_url = payload.proof_url;
    claim.remarks = payload.remarks;

    let tx = state
        .engine
        .submit_payment(&user.id, claim, Utc::now())
        .await?;
    Ok(Json(view(tx)))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<TransactionsResponse>, ServerError> {
    require_admin(&user)?;

    let transactions = state
        .engine
        .list_transactions(query.status.map(unmap_status))
        .await?
        .into_iter()
        .map(view)
        .collect();
    Ok(Json(TransactionsResponse { transactions }))
}

pub async fn decide(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecisionRequest>,
) -> Result<Json<DecisionResponse>, ServerError> {
    require_admin(&user)?;

    let outcome = match payload.action {
        DecisionAction::Approve => DecisionOutcome::Approve,
        DecisionAction::Reject => DecisionOutcome::Reject,
    };
    let decision = state
        .engine
        .decide_payment(&user.id, id, outcome, Utc::now())
        .await?;
    Ok(Json(DecisionResponse {
        transaction_status: map_status(decision.transaction_status),
        contribution_updated: decision.contribution_updated,
        points_added: decision.points_added,
    }))
}
