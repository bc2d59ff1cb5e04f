//! byond-topic CLI
//!
//! Sends a single topic query to a world server and prints the reply.

use std::process::ExitCode;
use std::time::Duration;

use byond_topic::{ClientConfig, Context, QueryClient};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// byond-topic CLI
#[derive(Parser, Debug)]
#[command(name = "byond-topic")]
#[command(about = "Send a topic query to a BYOND world server")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short = 'H', long, default_value = "127.0.0.1:5000")]
    host: String,

    /// Connect timeout in milliseconds (0 = none)
    #[arg(long, default_value = "5000")]
    connect_timeout_ms: u64,

    /// Overall deadline for the call in milliseconds (0 = none)
    #[arg(short, long, default_value = "10000")]
    timeout_ms: u64,

    /// Send without waiting for a reply
    #[arg(long)]
    no_response: bool,

    /// Print the reply as hex instead of text
    #[arg(long)]
    hex: bool,

    /// Query string, e.g. "?status"
    query: String,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,byond_topic=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = ClientConfig::builder()
        .host(&args.host)
        .connect_timeout_ms(args.connect_timeout_ms)
        .build();
    let client = QueryClient::with_config(config);

    let ctx = if args.timeout_ms > 0 {
        Context::with_timeout(Duration::from_millis(args.timeout_ms))
    } else {
        Context::background()
    };

    tracing::info!("Querying {}", client.host());

    match client.query(&ctx, args.query.as_bytes(), !args.no_response) {
        Ok(Some(payload)) => {
            if args.hex {
                println!("{}", to_hex(&payload));
            } else {
                println!("{}", String::from_utf8_lossy(&payload));
            }
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
