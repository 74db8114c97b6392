mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use edu_admin::dto::{class_info, supplier};
use edu_admin::{DomainError, EduAdmin, em_class_info, em_textbook_sup};
use eduadmin_db::DbHandle;
use eduadmin_errors::Problem;
use eduadmin_security::SecurityContext;
use serde_json::json;

use crate::commands::{EntityAction, run_entity};
use crate::config::{AppConfig, CliOverrides};

/// Textbook supplier and class administration
#[derive(Parser)]
#[command(name = "eduadmin")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database DSN (overrides config)
    #[arg(long, global = true)]
    dsn: Option<String>,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// User id the operation runs as; 0 is anonymous
    #[arg(long, global = true, default_value_t = 0)]
    as_user: i32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Validate configuration, print the effective configuration and exit
    Check,
    /// Textbook suppliers
    #[command(subcommand)]
    Supplier(EntityAction),
    /// Class information
    #[command(subcommand)]
    Class(EntityAction),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // defaults -> YAML (if provided) -> env (EDUADMIN__*) -> CLI overrides
    let overrides = CliOverrides {
        dsn: cli.dsn.clone(),
        verbose: cli.verbose,
    };
    let config = AppConfig::load(cli.config.as_deref(), &overrides)?;
    logging::init(&config.logging)?;

    if matches!(cli.command, Commands::Check) {
        return check_config(&config);
    }

    let db = DbHandle::from_config(&config.database).await?;
    let ctx = SecurityContext::builder()
        .subject_id(cli.as_user)
        .request_id(&format!("cli-{}", std::process::id()))
        .build();

    let outcome = run(cli.command, &db, &config, &ctx).await;
    db.close().await?;

    match outcome {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => match err.downcast::<DomainError>() {
            Ok(domain) => {
                let mut problem = Problem::from(domain);
                if let Some(id) = ctx.request_id() {
                    problem = problem.with_request_id(id);
                }
                tracing::warn!(code = %problem.code, status = problem.status.as_u16(), "operation failed");
                println!("{}", serde_json::to_string_pretty(&problem)?);
                Ok(ExitCode::FAILURE)
            }
            Err(other) => Err(other),
        },
    }
}

fn check_config(config: &AppConfig) -> Result<ExitCode> {
    tracing::info!("Checking configuration...");
    DbHandle::detect(&config.database.dsn)?;
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(ExitCode::SUCCESS)
}

async fn run(
    command: Commands,
    db: &DbHandle,
    config: &AppConfig,
    ctx: &SecurityContext,
) -> Result<serde_json::Value> {
    match command {
        Commands::Check => Ok(serde_json::to_value(config)?),
        Commands::Migrate => {
            let report = EduAdmin::migrate(db).await?;
            Ok(json!({
                "applied": report.applied,
                "skipped": report.skipped,
                "appliedNames": report.applied_names,
            }))
        }
        Commands::Supplier(action) => {
            let admin = EduAdmin::init(db, &config.edu_admin())?;
            run_entity::<em_textbook_sup::Entity, _, supplier::InsertReq, supplier::UpdateReq>(
                admin.suppliers(),
                ctx,
                action,
            )
            .await
        }
        Commands::Class(action) => {
            let admin = EduAdmin::init(db, &config.edu_admin())?;
            run_entity::<em_class_info::Entity, _, class_info::InsertReq, class_info::UpdateReq>(
                admin.classes(),
                ctx,
                action,
            )
            .await
        }
    }
}
