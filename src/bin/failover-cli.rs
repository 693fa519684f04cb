use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "failover-cli")]
#[command(about = "Query a running failover-server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8097")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show failover mode and the latest probe round
    Status,
    /// Fetch the JSON description of an item
    Item {
        name: String,
    },
    /// Print the diagnostics page for a path under /generic
    Generic {
        #[arg(default_value = "page")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/status", base)).send().await?;
            print_json(res).await?;
        }
        Commands::Item { name } => {
            let res = client.get(format!("{}/item/{}", base, name)).send().await?;
            print_json(res).await?;
        }
        Commands::Generic { path } => {
            let res = client
                .get(format!("{}/generic/{}", base, path.trim_start_matches('/')))
                .send()
                .await?;
            print!("{}", res.text().await?);
        }
    }

    Ok(())
}

async fn print_json(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
