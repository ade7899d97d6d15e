pub use sea_orm_migration::prelude::*;

mod m20260620_090000_users;
mod m20260620_091500_contributions;
mod m20260620_093000_transactions;
mod m20260620_094500_audit_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260620_090000_users::Migration),
            Box::new(m20260620_091500_contributions::Migration),
            Box::new(m20260620_093000_transactions::Migration),
            Box::new(m20260620_094500_audit_logs::Migration),
        ]
    }
}
