use chrono::{TimeZone, Utc};
use migration::MigratorTrait;
use sea_orm::{ActiveValue, Database, DatabaseConnection, EntityTrait};
use uuid::Uuid;

use engine::{
    Contribution, ContributionStatus, DecisionOutcome, Engine, EngineError, PaymentClaim,
    PaymentMethod, Role, TransactionStatus, audit, contributions, transactions, users,
};

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn seed_user(db: &DatabaseConnection, id: &str, role: Role) {
    let user = users::ActiveModel {
        id: ActiveValue::Set(id.to_string()),
        email: ActiveValue::Set(format!("{id}@example.org")),
        full_name: ActiveValue::Set(id.to_string()),
        password: ActiveValue::Set("secret".to_string()),
        phone: ActiveValue::Set(None),
        graduation_year: ActiveValue::Set(Some(2012)),
        role: ActiveValue::Set(role.as_str().to_string()),
        is_active: ActiveValue::Set(true),
        contribution_score: ActiveValue::Set(0),
        created_at: ActiveValue::Set(Utc::now()),
    };
    users::Entity::insert(user).exec(db).await.unwrap();
}

async fn seed_contribution(
    db: &DatabaseConnection,
    user_id: &str,
    status: ContributionStatus,
    due_date: chrono::DateTime<Utc>,
) -> Uuid {
    let contribution = Contribution::new(
        user_id.to_string(),
        1,
        2024,
        100_000,
        due_date,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    )
    .unwrap();
    let mut active = contributions::ActiveModel::from(&contribution);
    active.status = ActiveValue::Set(status.as_str().to_string());
    contributions::Entity::insert(active).exec(db).await.unwrap();
    contribution.id
}

async fn score_of(db: &DatabaseConnection, user_id: &str) -> i64 {
    users::Entity::find_by_id(user_id.to_string())
        .one(db)
        .await
        .unwrap()
        .unwrap()
        .contribution_score
}

async fn audit_actions(db: &DatabaseConnection) -> Vec<String> {
    audit::Entity::find()
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.action)
        .collect()
}

#[tokio::test]
async fn submit_forces_submitter_identity_and_pending_status() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice", Role::Member).await;

    let now = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
    let claim = PaymentClaim::new(100_000, PaymentMethod::BankTransfer)
        .reference_number("TRF-0042")
        .remarks("January dues");
    let tx = engine.submit_payment("alice", claim, now).await.unwrap();

    assert_eq!(tx.user_id, "alice");
    assert_eq!(tx.status, TransactionStatus::Pending);
    assert_eq!(tx.verified_by, None);

    let stored = transactions::Entity::find_by_id(tx.id.to_string())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.user_id, "alice");
    assert_eq!(stored.status, "Pending");
    assert_eq!(stored.reference_number.as_deref(), Some("TRF-0042"));
    assert_eq!(stored.payment_method, "Bank Transfer");
}

#[tokio::test]
async fn submit_rejects_non_positive_amounts() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .submit_payment(
            "alice",
            PaymentClaim::new(0, PaymentMethod::Cash),
            Utc::now(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn approve_on_time_marks_paid_and_scores_full_points() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice", Role::Member).await;
    let due = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    let contribution_id = seed_contribution(&db, "alice", ContributionStatus::Pending, due).await;

    let submitted_at = Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap();
    let tx = engine
        .submit_payment(
            "alice",
            PaymentClaim::new(100_000, PaymentMethod::BankTransfer)
                .contribution_id(contribution_id),
            submitted_at,
        )
        .await
        .unwrap();

    let decided_at = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
    let decision = engine
        .decide_payment("treasurer", tx.id, DecisionOutcome::Approve, decided_at)
        .await
        .unwrap();

    assert_eq!(decision.transaction_status, TransactionStatus::Verified);
    assert!(decision.contribution_updated);
    assert_eq!(decision.points_added, Some(10));

    let stored_tx = transactions::Entity::find_by_id(tx.id.to_string())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_tx.status, "Verified");
    assert_eq!(stored_tx.verified_by.as_deref(), Some("treasurer"));
    assert_eq!(stored_tx.verified_at, Some(decided_at));

    let stored = contributions::Entity::find_by_id(contribution_id.to_string())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "Paid");
    assert_eq!(stored.amount_paid_minor, 100_000);
    assert_eq!(stored.paid_at, Some(decided_at));

    assert_eq!(score_of(&db, "alice").await, 10);

    let entries = audit::Entity::find().all(&db).await.unwrap();
    assert_eq!(entries.len(), 2);
    let approve = entries
        .iter()
        .find(|e| e.action == "PAYMENT_APPROVE")
        .unwrap();
    assert_eq!(approve.target_id, Some(tx.id.to_string()));
    assert_eq!(approve.actor_id, "treasurer");
    let score = entries.iter().find(|e| e.action == "UPDATE_SCORE").unwrap();
    assert_eq!(score.target_id.as_deref(), Some("alice"));
}

#[tokio::test]
async fn approve_after_due_date_scores_reduced_points() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice", Role::Member).await;
    let due = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    let contribution_id = seed_contribution(&db, "alice", ContributionStatus::Late, due).await;

    let tx = engine
        .submit_payment(
            "alice",
            PaymentClaim::new(100_000, PaymentMethod::Cash).contribution_id(contribution_id),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    let decided_at = Utc.with_ymd_and_hms(2024, 2, 2, 0, 0, 0).unwrap();
    let decision = engine
        .decide_payment("treasurer", tx.id, DecisionOutcome::Approve, decided_at)
        .await
        .unwrap();

    assert_eq!(decision.points_added, Some(5));
    assert_eq!(score_of(&db, "alice").await, 5);

    let stored = contributions::Entity::find_by_id(contribution_id.to_string())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "Paid");
}

#[tokio::test]
async fn reject_touches_neither_contribution_nor_score() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice", Role::Member).await;
    let due = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    let contribution_id = seed_contribution(&db, "alice", ContributionStatus::Pending, due).await;

    let tx = engine
        .submit_payment(
            "alice",
            PaymentClaim::new(100_000, PaymentMethod::Online).contribution_id(contribution_id),
            Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    let decision = engine
        .decide_payment(
            "treasurer",
            tx.id,
            DecisionOutcome::Reject,
            Utc.with_ymd_and_hms(2024, 1, 9, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(decision.transaction_status, TransactionStatus::Rejected);
    assert!(!decision.contribution_updated);
    assert_eq!(decision.points_added, None);

    let stored = contributions::Entity::find_by_id(contribution_id.to_string())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, "Pending");
    assert_eq!(stored.amount_paid_minor, 0);
    assert_eq!(score_of(&db, "alice").await, 0);
    assert_eq!(audit_actions(&db).await, vec!["PAYMENT_REJECT".to_string()]);
}

#[tokio::test]
async fn approve_unlinked_claim_leaves_everything_else_alone() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice", Role::Member).await;
    let due = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    seed_contribution(&db, "alice", ContributionStatus::Pending, due).await;

    let tx = engine
        .submit_payment(
            "alice",
            PaymentClaim::new(300_000, PaymentMethod::BankTransfer),
            Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    let decision = engine
        .decide_payment(
            "treasurer",
            tx.id,
            DecisionOutcome::Approve,
            Utc.with_ymd_and_hms(2024, 1, 9, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(decision.transaction_status, TransactionStatus::Verified);
    assert!(!decision.contribution_updated);
    assert_eq!(decision.points_added, None);

    let rows = contributions::Entity::find().all(&db).await.unwrap();
    assert!(rows.iter().all(|r| r.status == "Pending"));
    assert_eq!(score_of(&db, "alice").await, 0);
    assert_eq!(audit_actions(&db).await, vec!["PAYMENT_APPROVE".to_string()]);
}

#[tokio::test]
async fn approve_with_dangling_link_still_verifies_the_claim() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice", Role::Member).await;

    let tx = engine
        .submit_payment(
            "alice",
            PaymentClaim::new(100_000, PaymentMethod::Cash).contribution_id(Uuid::new_v4()),
            Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    let decision = engine
        .decide_payment(
            "treasurer",
            tx.id,
            DecisionOutcome::Approve,
            Utc.with_ymd_and_hms(2024, 1, 9, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(decision.transaction_status, TransactionStatus::Verified);
    assert!(!decision.contribution_updated);
    assert_eq!(decision.points_added, None);
    assert_eq!(score_of(&db, "alice").await, 0);
    assert_eq!(audit_actions(&db).await, vec!["PAYMENT_APPROVE".to_string()]);
}

#[tokio::test]
async fn deciding_twice_fails_without_further_effects() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice", Role::Member).await;
    let due = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    let contribution_id = seed_contribution(&db, "alice", ContributionStatus::Pending, due).await;

    let tx = engine
        .submit_payment(
            "alice",
            PaymentClaim::new(100_000, PaymentMethod::BankTransfer)
                .contribution_id(contribution_id),
            Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    engine
        .decide_payment(
            "treasurer",
            tx.id,
            DecisionOutcome::Approve,
            Utc.with_ymd_and_hms(2024, 1, 9, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    let err = engine
        .decide_payment(
            "chairman",
            tx.id,
            DecisionOutcome::Reject,
            Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));

    let stored_tx = transactions::Entity::find_by_id(tx.id.to_string())
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored_tx.status, "Verified");
    assert_eq!(stored_tx.verified_by.as_deref(), Some("treasurer"));
    assert_eq!(score_of(&db, "alice").await, 10);
    assert_eq!(audit_actions(&db).await.len(), 2);
}

#[tokio::test]
async fn deciding_a_missing_transaction_fails_not_found() {
    let (engine, _db) = engine_with_db().await;
    let err = engine
        .decide_payment(
            "treasurer",
            Uuid::new_v4(),
            DecisionOutcome::Approve,
            Utc::now(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn approve_refuses_to_overwrite_paid_or_waived_contributions() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice", Role::Member).await;
    seed_user(&db, "bob", Role::Member).await;
    let due = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
    let paid = seed_contribution(&db, "alice", ContributionStatus::Paid, due).await;
    let waived = seed_contribution(&db, "bob", ContributionStatus::Waived, due).await;

    for (user, contribution_id) in [("alice", paid), ("bob", waived)] {
        let tx = engine
            .submit_payment(
                user,
                PaymentClaim::new(100_000, PaymentMethod::Cash).contribution_id(contribution_id),
                Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
            )
            .await
            .unwrap();

        let err = engine
            .decide_payment(
                "treasurer",
                tx.id,
                DecisionOutcome::Approve,
                Utc.with_ymd_and_hms(2024, 1, 9, 0, 0, 0).unwrap(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidState(_)));

        // The refused decision must not consume the claim.
        let stored_tx = transactions::Entity::find_by_id(tx.id.to_string())
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored_tx.status, "Pending");
        assert_eq!(score_of(&db, user).await, 0);
    }

    assert!(audit_actions(&db).await.is_empty());
}

#[tokio::test]
async fn pending_queue_lists_newest_first() {
    let (engine, db) = engine_with_db().await;
    seed_user(&db, "alice", Role::Member).await;

    let first = engine
        .submit_payment(
            "alice",
            PaymentClaim::new(100_000, PaymentMethod::Cash),
            Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();
    let second = engine
        .submit_payment(
            "alice",
            PaymentClaim::new(200_000, PaymentMethod::Online),
            Utc.with_ymd_and_hms(2024, 1, 9, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    engine
        .decide_payment(
            "treasurer",
            first.id,
            DecisionOutcome::Reject,
            Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    let pending = engine
        .list_transactions(Some(TransactionStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, second.id);

    let all = engine.list_transactions(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, second.id);
    assert_eq!(all[1].id, first.id);
}
