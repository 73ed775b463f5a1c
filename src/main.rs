use clap::{Args, Parser, Subcommand};
use keypad_checkout::application::checkout::CheckoutUrlBuilder;
use keypad_checkout::application::session::{CheckoutView, KeypadController};
use keypad_checkout::config::{
    CheckoutConfig, DEFAULT_PRODUCTION_BASE_URL, DEFAULT_STAGING_BASE_URL,
};
use keypad_checkout::domain::amount::AmountBuffer;
use keypad_checkout::domain::options::CheckoutOptions;
use keypad_checkout::domain::ports::OrderApiRef;
use keypad_checkout::error::CheckoutError;
use keypad_checkout::infrastructure::http::HttpOrderApi;
use keypad_checkout::infrastructure::in_memory::InMemoryOrderApi;
use keypad_checkout::interfaces::http::{AppState, create_router};
use keypad_checkout::interfaces::keypad::command_reader::CommandReader;
use miette::{IntoDiagnostic, Result};
use std::io::{self, IsTerminal, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

const PLACEHOLDER: &str = "Enter an amount";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    checkout: CheckoutArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct CheckoutArgs {
    /// Issue orders in-process instead of calling an order API.
    #[arg(long, global = true)]
    offline: bool,

    /// Deployment environment reported by the order proxy.
    #[arg(long, env = "CHECKOUT_ENVIRONMENT", default_value = "staging", global = true)]
    environment: String,

    /// JSON file with the checkout options template.
    #[arg(long, env = "CHECKOUT_OPTIONS", global = true)]
    options: Option<PathBuf>,

    #[arg(
        long,
        env = "CHECKOUT_STAGING_BASE_URL",
        default_value = DEFAULT_STAGING_BASE_URL,
        global = true
    )]
    staging_base_url: Url,

    #[arg(
        long,
        env = "CHECKOUT_PRODUCTION_BASE_URL",
        default_value = DEFAULT_PRODUCTION_BASE_URL,
        global = true
    )]
    production_base_url: Url,

    /// Order API request timeout, in seconds.
    #[arg(long, default_value_t = 30, global = true)]
    timeout_secs: u64,
}

#[derive(Args)]
struct ClientArgs {
    /// Order endpoint, usually the `serve` proxy.
    #[arg(long, env = "CHECKOUT_API_URL", default_value = "http://127.0.0.1:3000/api/orders")]
    api_url: Url,
}

#[derive(Subcommand)]
enum Command {
    /// Serve `POST /api/orders`, forwarding requests to the upstream order API.
    Serve {
        #[arg(long, env = "CHECKOUT_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,

        /// Upstream order API endpoint. Required unless `--offline`.
        #[arg(long, env = "CHECKOUT_UPSTREAM_URL")]
        upstream_url: Option<Url>,

        #[arg(long, env = "CHECKOUT_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },
    /// Print the checkout URL for one amount.
    Url {
        /// Dollar amount, as typed on the keypad.
        #[arg(long)]
        amount: String,

        #[command(flatten)]
        client: ClientArgs,
    },
    /// Read keypad presses from stdin and print the final checkout URL.
    Keypad {
        #[command(flatten)]
        client: ClientArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();
    let checkout = cli.checkout;
    let timeout = Duration::from_secs(checkout.timeout_secs);

    match cli.command {
        Command::Serve {
            bind,
            upstream_url,
            api_key,
        } => {
            let api: OrderApiRef = if checkout.offline {
                Arc::new(InMemoryOrderApi::new(checkout.environment.clone()))
            } else {
                let upstream = upstream_url
                    .ok_or_else(|| {
                        CheckoutError::Config("--upstream-url is required unless --offline".into())
                    })
                    .into_diagnostic()?;
                Arc::new(HttpOrderApi::new(upstream, api_key, timeout).into_diagnostic()?)
            };

            let router = create_router(AppState::new(api, checkout.environment.as_str()));
            let listener = tokio::net::TcpListener::bind(bind).await.into_diagnostic()?;
            info!(
                addr = %listener.local_addr().into_diagnostic()?,
                environment = %checkout.environment,
                "order proxy listening"
            );

            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = tokio::signal::ctrl_c().await;
                })
                .await
                .into_diagnostic()?;
        }
        Command::Url { amount, client } => {
            let builder = url_builder(&checkout, &client, timeout)?;
            let line = match builder.build(&amount).await.into_diagnostic()? {
                Some(url) => url.to_string(),
                None => PLACEHOLDER.to_string(),
            };
            println!("{line}");
        }
        Command::Keypad { client } => {
            let builder = Arc::new(url_builder(&checkout, &client, timeout)?);
            let mut controller = KeypadController::new(builder, AmountBuffer::new());

            let stdout = io::stdout();
            let mut out = stdout.lock();
            let stdin = io::stdin();
            for command in CommandReader::new(stdin.lock()).commands() {
                match command {
                    Ok(command) => {
                        controller.apply(command);
                        controller.poll();
                        writeln!(out, "{}", controller.session().amount()).into_diagnostic()?;
                    }
                    Err(e) => warn!(error = %e, "skipping keypad input"),
                }
            }

            let line = match controller.settle().await {
                CheckoutView::Ready(url) => url.to_string(),
                CheckoutView::Placeholder | CheckoutView::Loading => PLACEHOLDER.to_string(),
            };
            writeln!(out, "{line}").into_diagnostic()?;
        }
    }

    Ok(())
}

fn url_builder(
    checkout: &CheckoutArgs,
    client: &ClientArgs,
    timeout: Duration,
) -> Result<CheckoutUrlBuilder> {
    let template = match &checkout.options {
        Some(path) => {
            let json = std::fs::read_to_string(path).into_diagnostic()?;
            CheckoutOptions::from_json(&json).into_diagnostic()?
        }
        None => CheckoutOptions::default(),
    };

    let api: OrderApiRef = if checkout.offline {
        Arc::new(InMemoryOrderApi::new(checkout.environment.clone()))
    } else {
        Arc::new(HttpOrderApi::new(client.api_url.clone(), None, timeout).into_diagnostic()?)
    };

    let config = CheckoutConfig::new(
        checkout.staging_base_url.clone(),
        checkout.production_base_url.clone(),
    );
    Ok(CheckoutUrlBuilder::new(api, template, config))
}
