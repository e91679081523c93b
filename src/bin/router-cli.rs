use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Inspect a running api-router through its control API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(short, long, default_value = "admin-secret-key")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show table generation, size and enabled features
    Status,
    /// Dump the route schema
    Routes,
    /// Resolve a request path
    Resolve { path: String },
    /// Build the URL for a named route
    Reverse {
        name: String,
        /// Parameters as key=value
        params: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = format!("{}/_router", cli.url.trim_end_matches('/'));

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let res = match cli.command {
        Commands::Status => client.get(format!("{}/status", base)).headers(headers).send().await?,
        Commands::Routes => client.get(format!("{}/routes", base)).headers(headers).send().await?,
        Commands::Resolve { path } => {
            client
                .get(format!("{}/resolve", base))
                .query(&[("path", path)])
                .headers(headers)
                .send()
                .await?
        }
        Commands::Reverse { name, params } => {
            let params = parse_params(&params)?;
            client
                .post(format!("{}/reverse", base))
                .headers(headers)
                .json(&json!({ "name": name, "params": params }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

fn parse_params(raw: &[String]) -> Result<Map<String, Value>, String> {
    raw.iter()
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => Ok((k.to_string(), Value::String(v.to_string()))),
            None => Err(format!("expected key=value, got '{}'", pair)),
        })
        .collect()
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: control API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
