pub use audit::{AuditAction, SYSTEM_ACTOR};
pub use commands::{DecisionOutcome, PaymentClaim};
pub use contributions::{Contribution, ContributionStatus};
pub use error::EngineError;
pub use ops::{BillingPeriod, Engine, EngineBuilder, PaymentDecision};
pub use policy::BillingPolicy;
pub use scoring::{LATE_POINTS, ON_TIME_POINTS, payment_points};
pub use transactions::{PaymentMethod, Transaction, TransactionStatus};
pub use users::Role;

pub mod audit;
mod commands;
pub mod contributions;
mod error;
mod ops;
mod policy;
mod scoring;
pub mod transactions;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
