use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "portfolio-cli")]
#[command(about = "Management CLI for the portfolio API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service liveness
    Health,
    /// Check service readiness and dependency status
    Ready,
    /// View aggregate stats and runtime info
    Stats,
    /// List portfolio projects
    Projects,
    /// Inspect storage directories
    Storage,
    /// Tail the application log
    Logs {
        /// Number of log lines to fetch
        #[arg(short, long, default_value_t = 50)]
        lines: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let path = match &cli.command {
        Commands::Health => "/health".to_string(),
        Commands::Ready => "/ready".to_string(),
        Commands::Stats => "/api/stats".to_string(),
        Commands::Projects => "/api/projects".to_string(),
        Commands::Storage => "/api/storage".to_string(),
        Commands::Logs { lines } => format!("/api/logs?lines={lines}"),
    };

    let res = client.get(format!("{}{}", cli.url, path)).send().await?;
    print_response(res).await?;

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;

    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
    }
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
