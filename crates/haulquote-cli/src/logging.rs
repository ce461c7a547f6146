//! Tracing setup for the CLI

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_FILTER: &str = "haulquote=info,haulquote_app=info,haulquote_vision=warn";
const VERBOSE_LOG_FILTER: &str = "haulquote=debug,haulquote_app=debug,haulquote_vision=debug";

/// Initialize tracing to stderr. `RUST_LOG` wins over both defaults.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        })
    });

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .with(filter)
        .try_init();
}
