use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tasktrack_db::{connect, Database};
use tasktrack_server::config::{Cli, Commands, ServerConfig};
use tasktrack_server::InnerAppState;
use tasktrack_service::seed::{self, StoreSummary};
use tasktrack_service::{LocalService, ServiceError};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // A store that cannot be reached at startup is fatal.
    let db = match connect(&cli.config.store_mode()).await {
        Ok(db) => db,
        Err(e) => {
            error!("failed to connect to store: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Some(Commands::Seed { reset }) => run_seed(db, reset).await,
        None => run_server(&cli.config, db).await,
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run_server(config: &ServerConfig, db: Arc<dyn Database>) -> Result<()> {
    let state = InnerAppState::new(db);

    if config.no_seed {
        info!("sample seeding disabled");
    } else {
        tasktrack_server::seed_on_startup(&state).await;
    }

    let addr = config.addr();
    let listener = TcpListener::bind(addr).await?;
    info!("tasktrack-server listening on {addr}");
    tasktrack_server::serve(listener, state).await
}

async fn run_seed(db: Arc<dyn Database>, reset: bool) -> Result<()> {
    let service = LocalService::new(db.clone());
    let outcome = reseed(&service, reset).await;
    db.close().await;

    let summary = outcome?;
    println!("Tasks: {}", summary.tasks);
    println!("  pending:   {}", summary.pending_tasks);
    println!("  completed: {}", summary.completed_tasks);
    println!("Expenses: {}", summary.expenses);
    println!("  total: {:.2}", summary.total_spent);
    for cat in &summary.categories {
        println!("  {:<12} {:>10.2} ({})", cat.category, cat.total, cat.count);
    }
    Ok(())
}

async fn reseed(service: &LocalService, reset: bool) -> Result<StoreSummary, ServiceError> {
    if reset {
        let (tasks, expenses) = seed::reset(service).await?;
        println!("Removed {tasks} tasks and {expenses} expenses");
    }
    seed::seed(service).await?;
    seed::store_summary(service).await
}
