use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "todo-cli")]
#[command(about = "Command-line client for the todo gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080/api/v1")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all todos
    List,
    /// Fetch one todo
    Get { id: u64 },
    /// Create a todo
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        completed: bool,
    },
    /// Replace a todo
    Update {
        id: u64,
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        completed: bool,
    },
    /// Delete a todo
    Delete { id: u64 },
    /// Show circuit breaker state for every upstream
    Breakers,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::List => client.get(format!("{base}/todo")).send().await?,
        Commands::Get { id } => {
            client
                .get(format!("{base}/todo"))
                .query(&[("id", id)])
                .send()
                .await?
        }
        Commands::Create { title, completed } => {
            client
                .post(format!("{base}/todo"))
                .json(&json!({ "title": title, "completed": completed }))
                .send()
                .await?
        }
        Commands::Update {
            id,
            title,
            completed,
        } => {
            client
                .put(format!("{base}/todo/{id}"))
                .json(&json!({ "title": title, "completed": completed }))
                .send()
                .await?
        }
        Commands::Delete { id } => client.delete(format!("{base}/todo/{id}")).send().await?,
        Commands::Breakers => client.get(format!("{base}/breakers")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let text = res.text().await?;
    if text.trim().is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
