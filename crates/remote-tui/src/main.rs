mod action;
mod app;
mod app_state;
mod component;
mod components;
mod theme;
mod widgets;

use anyhow::Context;
use remote_proto::browser::McwsCatalog;
use remote_proto::config::Config;
use remote_proto::mcws::McwsClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = remote_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("remote.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("mcws-remote log: {}", log_path.display());
    tracing::info!("mcws-remote starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config_path = Config::config_path();
    let config = Config::load()
        .with_context(|| format!("reading config {}", config_path.display()))?;
    if !config.server.is_valid() {
        anyhow::bail!(
            "no media server configured; set [server] url in {}",
            config_path.display()
        );
    }
    if config.commands.is_empty() {
        anyhow::bail!(
            "no [[commands]] configured in {}; add one with the catalog node to open",
            config_path.display()
        );
    }

    // ── Connect ──────────────────────────────────────────────────────────────
    let mut client = McwsClient::new(&config.server)?;
    let server_name = client
        .alive()
        .await
        .with_context(|| format!("media server at {} is not answering", config.server.url))?;
    client.authenticate().await.context("authenticating")?;
    tracing::info!("connected to {} at {}", server_name, client.base_url());

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let catalog = McwsCatalog::new(client, &config.browser);
    let app = app::App::new(&config, catalog, server_name);
    app.run().await?;

    Ok(())
}
