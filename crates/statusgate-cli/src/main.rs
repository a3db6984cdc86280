use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "statusgate-cli", version, about = "Statusgate CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the published status document
    Status {
        #[command(subcommand)]
        action: commands::status::StatusAction,
    },
    /// Publish document changes to the store
    Publish(commands::publish::PublishArgs),
    /// Block-schedule tools
    Schedule {
        #[command(subcommand)]
        action: commands::schedule::ScheduleAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status { action } => commands::status::run(action).await,
        Commands::Publish(args) => commands::publish::run(args).await,
        Commands::Schedule { action } => commands::schedule::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
