//! Handles settings for the application. Configuration is written in
//! `settings.toml`.

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Billing {
    pub amount_due_minor: i64,
    pub grace_days: i64,
}

#[derive(Debug, Deserialize)]
pub struct Scheduler {
    /// Minutes between late-status sweeps.
    pub sweep_minutes: u64,
    /// Hours between reminder passes; omit to disable reminders.
    pub remind_hours: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    /// Overrides the engine's default dues amount and grace window.
    pub billing: Option<Billing>,
    pub server: Option<Server>,
    pub scheduler: Option<Scheduler>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}
