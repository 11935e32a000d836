//! docqa CLI - question answering over PDF documents
//!
//! # Examples
//!
//! ```bash
//! # Build the default index from two PDFs
//! docqa process handbook.pdf policies.pdf
//!
//! # Ask a question against it
//! docqa ask "How many vacation days do new hires get?"
//!
//! # Interactive session against a named index
//! docqa chat --index contracts
//!
//! # List indexes
//! docqa list-indexes
//! ```

use clap::Parser;
use docqa::cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Install the global subscriber; logs go to stderr so stdout stays
/// clean for command output.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "docqa=info".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
