use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "brb-cli")]
#[command(about = "Control CLI for the BRB scene switcher", long_about = None)]
struct Cli {
    #[arg(short, long, env = "BRB_URL", default_value = "http://localhost:5987")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start streaming in OBS
    Start,
    /// Stop streaming in OBS
    Stop,
    /// Check the connection to OBS
    Health,
}

impl Commands {
    fn path(&self) -> &'static str {
        match self {
            Commands::Start => "/start",
            Commands::Stop => "/stop",
            Commands::Health => "/health",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let url = format!("{}{}", cli.url.trim_end_matches('/'), cli.command.path());
    let res = client.get(url).send().await?;

    if !print_response(res).await? {
        std::process::exit(1);
    }
    Ok(())
}

/// Print the JSON body; returns whether the call succeeded.
async fn print_response(res: reqwest::Response) -> Result<bool, Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) if status.is_success() => println!("{}", serde_json::to_string_pretty(&json)?),
        Ok(json) => {
            eprintln!("Error: switcher returned status {}", status);
            eprintln!("{}", serde_json::to_string_pretty(&json)?);
        }
        Err(_) => {
            eprintln!("Error: switcher returned status {}", status);
            eprintln!("Response: {}", text);
        }
    }
    Ok(status.is_success())
}
