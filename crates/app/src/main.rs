use std::time::Duration;

use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "amicale={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.database).await?;
    let policy = settings.billing.map(|billing| engine::BillingPolicy {
        amount_due_minor: billing.amount_due_minor,
        grace_days: billing.grace_days,
    });

    if let Some(server) = settings.server {
        let db = db.clone();
        tasks.spawn(async move {
            tracing::info!("Found server settings...");
            let mut builder = engine::Engine::builder().database(db.clone());
            if let Some(policy) = policy {
                builder = builder.policy(policy);
            }
            let engine = match builder.build().await {
                Ok(engine) => engine,
                Err(err) => {
                    tracing::error!("failed to build engine from database: {err}");
                    return;
                }
            };
            let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
            let addr = format!("{}:{}", bind, server.port);
            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(listener) => listener,
                Err(err) => {
                    tracing::error!("failed to bind server listener: {err}");
                    return;
                }
            };
            if let Err(err) = server::run_with_listener(engine, db, listener).await {
                tracing::error!("server failed: {err}");
            }
        });
    }

    if let Some(scheduler) = settings.scheduler {
        let sweep_db = db.clone();
        let sweep_minutes = scheduler.sweep_minutes;
        tasks.spawn(async move {
            tracing::info!("Found scheduler settings...");
            let engine = match engine::Engine::builder().database(sweep_db).build().await {
                Ok(engine) => engine,
                Err(err) => {
                    tracing::error!("failed to build engine from database: {err}");
                    return;
                }
            };
            let mut interval = tokio::time::interval(Duration::from_secs(sweep_minutes * 60));
            loop {
                interval.tick().await;
                match engine.sweep_late(Utc::now()).await {
                    Ok(0) => {}
                    Ok(swept) => tracing::info!("marked {swept} contributions late"),
                    Err(err) => tracing::error!("late sweep failed: {err}"),
                }
            }
        });

        if let Some(remind_hours) = scheduler.remind_hours {
            let remind_db = db.clone();
            tasks.spawn(async move {
                let engine = match engine::Engine::builder().database(remind_db).build().await {
                    Ok(engine) => engine,
                    Err(err) => {
                        tracing::error!("failed to build engine from database: {err}");
                        return;
                    }
                };
                let mut interval =
                    tokio::time::interval(Duration::from_secs(remind_hours * 3600));
                loop {
                    interval.tick().await;
                    match engine.send_reminders(Utc::now()).await {
                        Ok(sent) => tracing::info!("issued {sent} dues reminders"),
                        Err(err) => tracing::error!("reminder pass failed: {err}"),
                    }
                }
            });
        }
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
