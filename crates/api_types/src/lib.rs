use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod contribution {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum ContributionStatus {
        Pending,
        Paid,
        Late,
        Waived,
    }

    /// One obligation as shown to its member.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContributionView {
        pub id: Uuid,
        pub month: u32,
        pub year: i32,
        pub amount_due_minor: i64,
        pub amount_paid_minor: i64,
        pub status: ContributionStatus,
        pub due_date: DateTime<Utc>,
        pub paid_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContributionsResponse {
        pub contributions: Vec<ContributionView>,
    }

    /// Request body for the generation trigger.
    ///
    /// Omitting the period bills the current month.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GenerateRequest {
        pub month: Option<u32>,
        pub year: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GenerateResponse {
        pub generated: u32,
    }
}

pub mod payment {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum PaymentMethod {
        #[serde(rename = "Bank Transfer")]
        BankTransfer,
        Cash,
        Online,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum TransactionStatus {
        Pending,
        Verified,
        Rejected,
    }

    /// Member-submitted payment claim.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentSubmit {
        pub contribution_id: Option<Uuid>,
        pub amount_minor: i64,
        pub payment_method: PaymentMethod,
        pub reference_number: Option<String>,
        pub proof_url: Option<String>,
        pub remarks: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
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

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionsResponse {
        pub transactions: Vec<TransactionView>,
    }

    /// Query for the transactions listing.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionsQuery {
        pub status: Option<TransactionStatus>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DecisionAction {
        Approve,
        Reject,
    }

    /// Request body for a payment decision.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct DecisionRequest {
        pub action: DecisionAction,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DecisionResponse {
        pub transaction_status: TransactionStatus,
        pub contribution_updated: bool,
        pub points_added: Option<i64>,
    }
}

pub mod reminder {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RemindersResponse {
        pub sent: u64,
    }
}
