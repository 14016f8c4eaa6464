use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use contract_relay::http::request::{DeployRequest, X_API_KEY};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Client CLI for the Solidity deploy relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[arg(short, long, default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and deploy a Solidity source file
    Deploy {
        /// Path to the .sol file
        file: PathBuf,

        /// Contract to deploy when the source defines several
        #[arg(long)]
        contract: Option<String>,
    },
    /// Check gateway liveness
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Deploy { file, contract } => {
            let source = std::fs::read_to_string(&file)?;
            let mut request = DeployRequest::new(source);
            request.contract_name = contract;

            let res = client
                .post(format!("{}/deploy", cli.url))
                .header(X_API_KEY, &cli.key)
                .json(&request)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            println!("{} {}", res.status(), res.text().await?);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
    }

    match res.json::<Value>().await {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(e) => eprintln!("Undecodable response: {}", e),
    }
    Ok(())
}
