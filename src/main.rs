// Entrypoint for the terminal client.
// - Keeps `main` small: set up logging, build the API client and the
//   session store, and hand off to the UI loop.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use libshelf::{api::ApiClient, session::SessionStore, ui};

fn main() -> Result<()> {
    // Log to stderr so tables and prompts on stdout stay clean.
    // Verbosity comes from RUST_LOG, e.g. RUST_LOG=libshelf=debug.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let api = ApiClient::from_env()?;
    let store = SessionStore::default_location();
    ui::run(&api, &store)
}
