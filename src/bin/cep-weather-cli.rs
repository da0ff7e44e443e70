use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;

use cep_weather::observability::tracing::TRACEPARENT;
use cep_weather::pipeline::{validate, Temperatures};

#[derive(Parser)]
#[command(name = "cep-weather-cli")]
#[command(about = "Client for the CEP weather service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the current temperature for a postal code
    Lookup {
        /// Eight-digit CEP, e.g. 01310100
        cep: String,

        /// W3C traceparent to send, to join an existing trace
        #[arg(long)]
        traceparent: Option<String>,
    },
    /// Convert a Kelvin temperature locally, without calling the service
    Convert {
        kelvin: f64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lookup { cep, traceparent } => {
            if !validate(&cep) {
                eprintln!("Warning: '{}' is not an 8-digit CEP; the service will reject it", cep);
            }

            let mut headers = HeaderMap::new();
            if let Some(tp) = traceparent {
                headers.insert(TRACEPARENT, HeaderValue::from_str(&tp)?);
            }

            let client = reqwest::Client::new();
            let res = client
                .get(format!("{}/weather/{}", cli.url.trim_end_matches('/'), cep))
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Convert { kelvin } => {
            let t = Temperatures::from_kelvin(kelvin);
            println!("{:.1} °C", t.celsius);
            println!("{:.1} °F", t.fahrenheit);
            println!("{:.1} K", t.kelvin);
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if let Some(id) = res.headers().get("x-request-id").and_then(|v| v.to_str().ok()) {
        eprintln!("Request ID: {}", id);
    }

    let text = res.text().await?;
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }

    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        std::process::exit(1);
    }
    Ok(())
}
