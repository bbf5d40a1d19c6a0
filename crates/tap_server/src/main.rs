//! TAP API Server
//!
//! HTTP surface for the Tiered Access Protocol: tier catalog, token
//! issuance and consumption, usage statistics

use miette::IntoDiagnostic;
use tap_server::{ServerConfig, start_server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .rgb_colors(miette::RgbColors::Preferred)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))?;
    miette::set_panic_hook();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            "tap_core=debug,tap_api=debug,tap_server=debug",
        ))
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_timer(tracing_subscriber::fmt::time::LocalTime::rfc_3339())
        .pretty()
        .init();

    // Load config from TAP_CONFIG if set, defaults + env otherwise
    let config = match std::env::var("TAP_CONFIG") {
        Ok(path) => ServerConfig::load(&path).into_diagnostic()?,
        Err(_) => ServerConfig::from_env(),
    };

    // Start server
    start_server(config).await.into_diagnostic()?;

    Ok(())
}
