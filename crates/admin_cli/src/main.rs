use std::{error::Error, io::Write};

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use engine::{BillingPeriod, Engine, Role, users};
use migration::MigratorTrait;

#[derive(Parser, Debug)]
#[command(name = "amicale_admin")]
#[command(about = "Admin utilities for Amicale (bootstrap users, trigger billing)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./amicale.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Contributions(Contributions),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
    Promote(UserPromoteArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    full_name: String,
    #[arg(long, default_value = "Member")]
    role: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    graduation_year: Option<i32>,
}

#[derive(Args, Debug)]
struct UserPromoteArgs {
    #[arg(long)]
    email: String,
    #[arg(long)]
    role: String,
}

#[derive(Args, Debug)]
struct Contributions {
    #[command(subcommand)]
    command: ContributionsCommand,
}

#[derive(Subcommand, Debug)]
enum ContributionsCommand {
    /// Bill every active member for a period (defaults to the current month).
    Generate(GenerateArgs),
    /// Reclassify overdue pending contributions as late.
    Sweep,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long)]
    month: Option<u32>,
    #[arg(long)]
    year: Option<i32>,
    /// Actor recorded in the audit log.
    #[arg(long, default_value = engine::SYSTEM_ACTOR)]
    actor: String,
}

fn parse_role(raw: &str) -> Role {
    match Role::try_from(raw) {
        Ok(role) => role,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(out, Print(prompt))?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => {}
        }
        out.flush()?;
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    for _ in 0..3 {
        let first = prompt_password("Password: ")?;
        if first.is_empty() {
            eprintln!("Password must not be empty.");
            continue;
        }

        let second = prompt_password("Confirm password: ")?;
        if first == second {
            return Ok(first);
        }
        eprintln!("Passwords do not match. Try again.");
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let role = parse_role(&args.role);

            if users::Entity::find()
                .filter(users::Column::Email.eq(args.email.clone()))
                .one(&db)
                .await?
                .is_some()
            {
                eprintln!("user already exists: {}", args.email);
                std::process::exit(1);
            }

            let password = prompt_password_twice()?;
            let user = users::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                email: Set(args.email.clone()),
                full_name: Set(args.full_name),
                password: Set(password),
                phone: Set(args.phone),
                graduation_year: Set(args.graduation_year),
                role: Set(role.as_str().to_string()),
                is_active: Set(true),
                contribution_score: Set(0),
                created_at: Set(Utc::now()),
            };
            users::Entity::insert(user).exec(&db).await?;

            println!("created user: {}", args.email);
        }
        Command::User(User {
            command: UserCommand::Promote(args),
        }) => {
            let role = parse_role(&args.role);

            let Some(user) = users::Entity::find()
                .filter(users::Column::Email.eq(args.email.clone()))
                .one(&db)
                .await?
            else {
                eprintln!("user not found: {}", args.email);
                std::process::exit(1);
            };

            let mut user: users::ActiveModel = user.into();
            user.role = Set(role.as_str().to_string());
            user.update(&db).await?;

            println!("updated role for {}: {}", args.email, role.as_str());
        }
        Command::Contributions(Contributions {
            command: ContributionsCommand::Generate(args),
        }) => {
            let engine = Engine::builder().database(db.clone()).build().await?;
            let now = Utc::now();
            let current = BillingPeriod::containing(now);
            let period = BillingPeriod {
                month: args.month.unwrap_or(current.month),
                year: args.year.unwrap_or(current.year),
            };
            let generated = engine
                .generate_contributions(&args.actor, period, now)
                .await?;
            println!(
                "generated {generated} contributions for {}/{}",
                period.month, period.year
            );
        }
        Command::Contributions(Contributions {
            command: ContributionsCommand::Sweep,
        }) => {
            let engine = Engine::builder().database(db.clone()).build().await?;
            let swept = engine.sweep_late(Utc::now()).await?;
            println!("marked {swept} contributions late");
        }
    }

    Ok(())
}
