//! QKART storefront - terminal client for the QKART shop.
//!
//! Shows the products page, search-as-you-type and the cart panel in a
//! terminal. Commands are read from stdin, the page is written to stdout and
//! logs go to stderr.
//!
//! # Architecture
//!
//! - `CatalogController` owns catalog, display set and cart state
//! - `QkartClient` talks to the QKART REST backend
//! - `SessionStore` persists the token and username issued at login
//! - Askama text templates render the page

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use qkart_storefront::catalog::CatalogController;
use qkart_storefront::config::StorefrontConfig;
use qkart_storefront::error::{AppError, Result};
use qkart_storefront::notify::ToastQueue;
use qkart_storefront::qkart::QkartClient;
use qkart_storefront::session::SessionStore;
use qkart_storefront::shell::Shell;
use sentry::integrations::tracing as sentry_tracing;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// Terminal storefront for the QKART shop.
#[derive(Parser, Debug)]
#[command(name = "qkart-storefront")]
#[command(about = "Browse the QKART catalog and manage your cart", long_about = None)]
struct Args {
    /// Backend base URL (overrides `QKART_API_ENDPOINT`)
    #[arg(long)]
    endpoint: Option<Url>,

    /// Search quiet period in milliseconds (overrides `QKART_SEARCH_DEBOUNCE_MS`)
    #[arg(long)]
    debounce_ms: Option<u64>,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "qkart_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

fn load_config(args: Args) -> Result<StorefrontConfig> {
    let mut config = StorefrontConfig::from_env()?;
    if let Some(endpoint) = args.endpoint {
        config.api_endpoint = endpoint;
    }
    if let Some(ms) = args.debounce_ms {
        config.search_debounce = Duration::from_millis(ms);
    }
    Ok(config)
}

async fn run(config: StorefrontConfig) -> Result<()> {
    let store = SessionStore::open(&config.session_file).await?;
    let api = Arc::new(QkartClient::new(&config.api_endpoint));
    let toasts = Arc::new(ToastQueue::new());

    let controller = CatalogController::new(
        api,
        toasts.clone(),
        store.subscribe(),
        config.search_debounce,
    );

    tracing::info!(
        endpoint = %config.api_endpoint,
        session_file = %config.session_file.display(),
        "storefront started"
    );

    Shell::new(controller, store, toasts)
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_config(args) {
        Ok(config) => config,
        Err(e) => {
            startup_failure(&e);
            return ExitCode::FAILURE;
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_exit(&e);
            ExitCode::FAILURE
        }
    }
}

/// Tracing is not up yet when configuration fails.
#[allow(clippy::print_stderr)]
fn startup_failure(error: &AppError) {
    eprintln!("qkart-storefront: {error}");
}

fn report_exit(error: &AppError) {
    error.report();
    tracing::error!("storefront exiting");
}
