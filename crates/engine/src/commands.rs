//! Input types for engine operations.
//!
//! These group the member- and reviewer-supplied fields, keeping call sites
//! readable and making explicit which fields the engine forces itself.

use uuid::Uuid;

use crate::PaymentMethod;

/// Reviewer decision on a pending payment claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecisionOutcome {
    Approve,
    Reject,
}

/// Member-supplied fields of a payment claim.
///
/// `user_id` and `status` are never part of the claim: submission forces
/// them to the authenticated submitter and Pending.
#[derive(Clone, Debug)]
pub struct PaymentClaim {
    pub contribution_id: Option<Uuid>,
    pub amount_minor: i64,
    pub payment_method: PaymentMethod,
    pub reference_number: Option<String>,
    pub proof_url: Option<String>,
    pub remarks: Option<String>,
}

impl PaymentClaim {
    #[must_use]
    pub fn new(amount_minor: i64, payment_method: PaymentMethod) -> Self {
        Self {
            contribution_id: None,
            amount_minor,
            payment_method,
            reference_number: None,
            proof_url: None,
            remarks: None,
        }
    }

    #[must_use]
    pub fn contribution_id(mut self, contribution_id: Uuid) -> Self {
        self.contribution_id = Some(contribution_id);
        self
    }

    #[must_use]
    pub fn reference_number(mut self, reference_number: impl Into<String>) -> Self {
        self.reference_number = Some(reference_number.into());
        self
    }

    #[must_use]
    pub fn proof_url(mut self, proof_url: impl Into<String>) -> Self {
        self.proof_url = Some(proof_url.into());
        self
    }

    #[must_use]
    pub fn remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}
