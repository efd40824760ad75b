//! vPOS CLI
//!
//! Command-line interface for registering, checking and refunding gateway orders.
//! Credentials come from `VPOS_*` environment variables (a `.env` file is honored).

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use vpos_client::{ClientConfig, GatewayClient, RefundRequest, RegisterOrderRequest};

#[derive(Parser)]
#[command(name = "vpos")]
#[command(author, version, about = "vPOS payment gateway CLI", long_about = None)]
struct Cli {
    /// Prefix of the configuration environment variables
    #[arg(long, env = "VPOS_ENV_PREFIX", default_value = "VPOS_")]
    env_prefix: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register an order and print the payment page URL
    Register {
        /// Merchant order number (max 10 characters)
        #[arg(long)]
        order_number: String,
        /// Amount in major units, e.g. 806.50
        #[arg(long)]
        amount: String,
        #[arg(long)]
        return_url: String,
        /// Defaults to the return URL
        #[arg(long)]
        fail_url: Option<String>,
        /// Reference fields refId1..refId5 (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        reference: Vec<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        funding_type: Option<String>,
        /// Generated when omitted
        #[arg(long)]
        idempotency_key: Option<String>,
    },
    /// Fetch the status of an order
    Confirm {
        /// Gateway order ID
        order_id: String,
    },
    /// Refund a deposited order
    Refund {
        /// Gateway order ID
        order_id: String,
        /// Amount in major units
        #[arg(long)]
        amount: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,vpos_client=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = ClientConfig::from_env_with_prefix(&cli.env_prefix)?;
    let client = GatewayClient::new(config)?;

    match cli.command {
        Commands::Register {
            order_number,
            amount,
            return_url,
            fail_url,
            reference,
            description,
            funding_type,
            idempotency_key,
        } => {
            let mut references = reference.into_iter();
            let first = references.next().unwrap_or_default();
            let mut req = RegisterOrderRequest::new(order_number, amount, return_url, first)
                .with_idempotency_key(
                    idempotency_key.unwrap_or_else(|| Uuid::new_v4().to_string()),
                );
            for reference_id in references {
                req = req.with_reference_id(reference_id);
            }
            if let Some(fail_url) = fail_url {
                req = req.with_fail_url(fail_url);
            }
            if let Some(description) = description {
                req = req.with_description(description);
            }
            if let Some(indicator) = funding_type {
                req = req.with_funding_type_indicator(indicator);
            }

            let order = client.register(&req).await?;
            println!("{}", serde_json::to_string_pretty(&order)?);
            if !order.succeeded() {
                std::process::exit(1);
            }
        }

        Commands::Confirm { order_id } => {
            let status = client.confirm(&order_id).await?;
            println!("{}", serde_json::to_string_pretty(&status)?);
        }

        Commands::Refund { order_id, amount } => {
            let refund = client.refund(&RefundRequest::new(order_id, amount)).await?;
            println!("{}", serde_json::to_string_pretty(&refund)?);
        }
    }

    Ok(())
}
