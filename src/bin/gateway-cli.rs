use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Operator CLI for the edge gateway", long_about = None)]
struct Cli {
    /// Gateway base URL.
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway health and list registered services
    Health,
    /// Send a request through the gateway and print the JSON response
    Send {
        /// Path to request (e.g. /api/restaurants/42)
        path: String,

        /// HTTP method
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// JSON body for POST/PUT/PATCH
        #[arg(short, long)]
        body: Option<String>,

        /// Bearer token forwarded as Authorization header
        #[arg(short, long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client
                .get(format!("{}/healthz", cli.url))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Send {
            path,
            method,
            body,
            token,
        } => {
            let method: reqwest::Method = method.to_uppercase().parse()?;
            let mut req = client.request(method, format!("{}{}", cli.url, path));
            if let Some(token) = token {
                req = req.bearer_auth(token);
            }
            if let Some(body) = body {
                let json: Value = serde_json::from_str(&body)?;
                req = req.json(&json);
            }
            let res = req.send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    println!("Status: {}", status);

    match res.json::<Value>().await {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("(no JSON body)"),
    }
    Ok(())
}
