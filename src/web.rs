#![cfg(not(tarpaulin_include))]

use tfdb::Config;
use tfdb::app;

/// Main entry point for the web application
///
/// Reads `TFDB_*` settings from the environment and serves the site until
/// the process is stopped. Log output is controlled by `RUST_LOG`
/// (default `info`).
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    log::info!(
        "serving data from {} (static files from {})",
        config.data_dir.display(),
        config.static_dir.display()
    );

    app::run(config).await
}
