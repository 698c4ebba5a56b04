use checkout_flow::application::checkout::{CheckoutOrchestrator, FlowMode};
use checkout_flow::config::{Config, Environment};
use checkout_flow::domain::money::Money;
use checkout_flow::domain::order::{CreateOrder, Intent, OrderRequest, Prefer};
use checkout_flow::domain::ports::{ApprovalSignalBox, PaymentProviderBox};
use checkout_flow::infrastructure::approval::LineApproval;
use checkout_flow::infrastructure::in_memory::InMemoryPaymentProvider;
use checkout_flow::infrastructure::paypal::PayPalClient;
use checkout_flow::interfaces::console::report::ConsoleReport;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::io;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// create-only stops after the order exists; full-flow waits for approval and captures
    #[arg(long, default_value = "create-only")]
    mode: FlowMode,

    /// capture or authorize
    #[arg(long, default_value = "capture")]
    intent: Intent,

    #[arg(long, default_value = "20.00")]
    amount: Decimal,

    /// ISO 4217 currency code
    #[arg(long, default_value = "USD")]
    currency: String,

    #[arg(long, default_value = "Leather Bag")]
    description: String,

    /// minimal or representation
    #[arg(long, default_value = "minimal")]
    prefer: Prefer,

    /// sandbox or live. Overrides PAYPAL_ENVIRONMENT.
    #[arg(long)]
    environment: Option<Environment>,

    /// Request timeout in seconds, 0 waits forever
    #[arg(long, default_value_t = 0)]
    timeout_secs: u64,

    /// Run against an in-memory provider that approves every order
    #[arg(long)]
    offline: bool,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "checkout_flow=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();
    let cli = Cli::parse();

    let mut config = Config::from_env()
        .into_diagnostic()?
        .with_timeout_secs(cli.timeout_secs);
    if let Some(environment) = cli.environment {
        config = config.with_environment(environment);
    }

    let provider: PaymentProviderBox = if cli.offline {
        Box::new(InMemoryPaymentProvider::new().with_auto_approve())
    } else {
        Box::new(PayPalClient::new(&config).into_diagnostic()?)
    };
    let approval: ApprovalSignalBox = Box::new(LineApproval::stdin());
    let orchestrator = CheckoutOrchestrator::new(provider, approval, cli.mode);

    let request = CreateOrder::new(
        OrderRequest::single(
            cli.intent,
            Money::new(cli.currency, cli.amount),
            cli.description,
        ),
        cli.prefer,
    );

    let mut report = ConsoleReport::new(io::stdout(), io::stderr());
    let outcome = orchestrator.run(&request, &mut report).await.into_diagnostic()?;
    tracing::debug!(?outcome, "checkout run finished");

    Ok(())
}
