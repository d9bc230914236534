//! # Warframe Info Hub Desktop
//!
//! Native desktop client showing Warframe status pages.
//!
//! ## Architecture
//!
//! Page fragments are downloaded from the raw-content origin by
//! [`infohub_core`], assembled into a document and shown in a sandboxed
//! frame. A sidebar menu selects the page; the theme selector restyles the
//! shell and the frame without reloading it.
//!
//! ## Modules
//!
//! - [`components`] - UI components
//! - [`state`] - Shared application state

use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use dioxus::desktop::{Config, LogicalSize, WindowBuilder};
use dioxus::prelude::*;
use infohub_core::{AppPaths, Hub, HubConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod components;
mod state;

use components::Layout;
use state::{AppState, SharedHub};

/// Warframe Info Hub - live Warframe status pages
#[derive(Parser, Debug)]
#[command(name = "warframe-info-hub")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging and print environment details
    #[arg(long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "infohub=debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(&cli) {
        tracing::error!(error = %format!("{e:#}"), "Startup failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let paths = AppPaths::discover().context("failed to prepare application directories")?;
    if cli.debug {
        paths.log_environment();
    }

    let config = HubConfig::load(&paths.config_file());
    let hub = Hub::from_config(&config, &paths).context("failed to set up content fetcher")?;

    tracing::info!(base_url = %config.base_url, "Starting Warframe Info Hub");

    let cfg = Config::new().with_window(
        WindowBuilder::new()
            .with_title("Warframe Info Hub")
            .with_inner_size(LogicalSize::new(1200.0, 800.0))
            .with_min_inner_size(LogicalSize::new(800.0, 600.0)),
    );

    let shared: SharedHub = Arc::new(Mutex::new(hub));
    dioxus::LaunchBuilder::desktop()
        .with_cfg(cfg)
        .with_context(shared)
        .launch(App);
    Ok(())
}

/// Root application component.
///
/// Builds the shared state around the hub created at startup and shows the
/// home page.
#[component]
fn App() -> Element {
    let hub = use_context::<SharedHub>();
    let state = use_context_provider(|| AppState::new(hub));

    use_hook(move || state.show_home());

    rsx! {
        document::Stylesheet { href: asset!("/assets/shell.css") }
        Layout {}
    }
}
