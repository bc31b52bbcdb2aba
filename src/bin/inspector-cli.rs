use clap::{Parser, Subcommand};
use inspector_sdk::{InspectorClient, SdkError};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "inspector-cli")]
#[command(about = "Command line client for the Webhook Inspector", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080", env = "INSPECTOR_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check inspector status
    Status,
    /// List captured requests, newest first
    List {
        #[arg(short, long)]
        limit: Option<usize>,
        #[arg(short, long)]
        cursor: Option<String>,
        /// Follow cursors through every page
        #[arg(long, conflicts_with = "cursor")]
        all: bool,
    },
    /// Show one captured request
    Show { id: String },
    /// Delete one captured request
    Delete { id: String },
    /// Generate a TypeScript handler from captured bodies
    Generate {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = InspectorClient::new(&cli.url);

    let result = match cli.command {
        Commands::Status => print_json(client.status().await),
        Commands::List { limit, cursor, all } => {
            if all {
                print_json(client.list_all(limit.unwrap_or(100)).await)
            } else {
                print_json(client.list(limit, cursor.as_deref()).await)
            }
        }
        Commands::Show { id } => print_json(client.get(&id).await),
        Commands::Delete { id } => client.delete(&id).await.map(|()| {
            println!("Deleted {}", id);
        }),
        Commands::Generate { ids } => {
            let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
            client.generate(&ids).await.map(|code| println!("{}", code))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn print_json<T: Serialize>(result: Result<T, SdkError>) -> Result<(), SdkError> {
    let value = result?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
