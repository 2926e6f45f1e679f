use std::net::{IpAddr, SocketAddr};

use clap::{Args, Parser, Subcommand};
use tasktrack_db::StoreMode;

#[derive(Debug, Parser)]
#[command(name = "tasktrack-server", about = "Task and expense tracking API")]
pub struct Cli {
    #[command(flatten)]
    pub config: ServerConfig,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Insert the sample data set and print a summary of the store
    Seed {
        /// Delete every existing task and expense first
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Database connection string. Without one an in-memory store is used
    /// and everything is lost on exit.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to bind
    #[arg(long, env = "TASKTRACK_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Port to listen on
    #[arg(long, env = "TASKTRACK_PORT", default_value = "5000")]
    pub port: u16,

    /// Do not insert sample data into an empty store at startup
    #[arg(long, env = "TASKTRACK_NO_SEED")]
    pub no_seed: bool,
}

impl ServerConfig {
    pub fn store_mode(&self) -> StoreMode {
        StoreMode::from_url(self.database_url.as_deref())
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let cli = Cli::try_parse_from(["tasktrack-server"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config.port, 5000);
        assert_eq!(cli.config.addr().to_string(), "0.0.0.0:5000");
    }

    #[test]
    fn database_url_selects_configured_store() {
        let cli = Cli::try_parse_from([
            "tasktrack-server",
            "--database-url",
            "postgres://localhost/tasks",
            "--port",
            "8080",
        ])
        .unwrap();
        assert_eq!(
            cli.config.store_mode(),
            StoreMode::Configured("postgres://localhost/tasks".into())
        );
        assert_eq!(cli.config.port, 8080);
    }

    #[test]
    fn seed_subcommand_parses_reset() {
        let cli = Cli::try_parse_from(["tasktrack-server", "seed", "--reset"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Seed { reset: true })));
    }
}
