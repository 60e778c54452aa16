use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dpm::{generate_form, CheckoutRequest, DpmSignatureEngine, GatewayConfig};

/// Sign a DPM checkout form with the credentials in `AUTHNET_*` and print the
/// hidden fields and the gateway URL as JSON.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Transaction amount, e.g. 9.99
    #[arg(long)]
    amount: String,

    /// Fingerprint sequence number (random when omitted)
    #[arg(long)]
    sequence: Option<String>,

    /// Fingerprint timestamp in Unix seconds (now when omitted)
    #[arg(long)]
    timestamp: Option<String>,

    /// Extra form field passed through unsigned, as name=value. Repeatable.
    #[arg(long = "field", value_parser = parse_field)]
    fields: Vec<(String, String)>,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid gateway configuration");
            std::process::exit(1);
        }
    };

    let mut request = CheckoutRequest::new(cli.amount);
    if let Some(sequence) = cli.sequence {
        request = request.with_field(dpm::X_FP_SEQUENCE, sequence);
    }
    if let Some(timestamp) = cli.timestamp {
        request = request.with_field(dpm::X_FP_TIMESTAMP, timestamp);
    }
    for (name, value) in cli.fields {
        request = request.with_field(name, value);
    }

    let form = match generate_form(&DpmSignatureEngine, &config.credentials, &request) {
        Ok(form) => form,
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(2);
        }
    };

    let output = serde_json::json!({
        "serviceUrl": config.service_url(),
        "testMode": config.test_mode,
        "fields": form,
    });
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(2);
        }
    }
}
