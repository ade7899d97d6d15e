use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    ResultEngine,
    contributions::{self, Contribution},
    transactions::{self, Transaction, TransactionStatus},
};

use super::Engine;

impl Engine {
    /// A member's obligations, newest period first.
    pub async fn member_contributions(&self, user_id: &str) -> ResultEngine<Vec<Contribution>> {
        let models = contributions::Entity::find()
            .filter(contributions::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(contributions::Column::Year)
            .order_by_desc(contributions::Column::Month)
            .all(&self.database)
            .await?;
        models.into_iter().map(Contribution::try_from).collect()
    }

    /// Payment claims, newest first, optionally filtered by status.
    ///
    /// With `Some(Pending)` this is the reviewer's work queue.
    pub async fn list_transactions(
        &self,
        status: Option<TransactionStatus>,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query =
            transactions::Entity::find().order_by_desc(transactions::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(transactions::Column::Status.eq(status.as_str()));
        }
        let models = query.all(&self.database).await?;
        models.into_iter().map(Transaction::try_from).collect()
    }
}
