use clap::Parser;
use miette::{IntoDiagnostic, Result};
use order_checkout::application::controller::CheckoutController;
use order_checkout::config::CheckoutConfig;
use order_checkout::infrastructure::in_memory::InMemoryForm;
use order_checkout::infrastructure::sandbox::SandboxPaymentProvider;
use order_checkout::interfaces::csv::order_reader::OrderReader;
use order_checkout::interfaces::json::order_writer::JsonLinesRelay;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input orders CSV file
    input: PathBuf,

    /// Payment application id (must start with `sandbox-`)
    #[arg(long)]
    application_id: String,

    /// Merchant location id
    #[arg(long)]
    location_id: String,

    /// Simulated processing delay between tokenization and order hand-off
    #[arg(long, default_value_t = 1500)]
    processing_delay_ms: u64,

    /// Upper bound on a tokenize call; 0 waits indefinitely
    #[arg(long, default_value_t = 60_000)]
    tokenize_timeout_ms: u64,

    /// Run the page without a payment form (validation only)
    #[arg(long)]
    no_payment_form: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let tokenize_timeout =
        (cli.tokenize_timeout_ms > 0).then(|| Duration::from_millis(cli.tokenize_timeout_ms));
    let config = CheckoutConfig::new(cli.application_id, cli.location_id)
        .with_processing_delay(Duration::from_millis(cli.processing_delay_ms))
        .with_tokenize_timeout(tokenize_timeout);

    let form = Arc::new(if cli.no_payment_form {
        InMemoryForm::without_payment_form()
    } else {
        InMemoryForm::new()
    });
    let provider = SandboxPaymentProvider::new();
    let card_entry = provider.card_entry();
    let relay = JsonLinesRelay::new(io::stdout());

    let controller =
        CheckoutController::new(config, Box::new(provider), Box::new(relay), form.clone());

    if let Err(e) = controller.initialize().await {
        eprintln!("Payment initialization failed: {}", e);
    }

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = OrderReader::new(file);
    for (index, request) in reader.orders().enumerate() {
        match request {
            Ok(request) => {
                let (input, card) = request.into_parts();
                form.fill(&input);
                card_entry.enter(card);
                let outcome = controller.handle_submit().await;
                eprintln!("order {}: {}", index + 1, outcome);
            }
            Err(e) => {
                eprintln!("Error reading order: {}", e);
            }
        }
    }

    Ok(())
}
