use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::Context;
use clap::Parser;
use client_core::{load_settings, ClientSettings, ConnectionManager};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::{controller::events::UiEvent, ui::SegViewApp};

const UI_EVENT_QUEUE: usize = 256;

#[derive(Debug, Parser)]
#[command(name = "segview", about = "Interactive viewer for a real-time segmentation backend")]
struct Args {
    /// Backend origin, e.g. http://127.0.0.1:8000
    #[arg(long)]
    server_url: Option<String>,
    /// Delay before retrying a lost control channel.
    #[arg(long)]
    reconnect_delay_ms: Option<u64>,
    /// Settings file; defaults to ./segview.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn settings(&self) -> anyhow::Result<ClientSettings> {
        let mut settings = load_settings(self.config.as_deref())?;
        if let Some(server_url) = &self.server_url {
            settings.server_url = server_url.clone();
        }
        if let Some(delay) = self.reconnect_delay_ms {
            settings.reconnect_delay_ms = delay;
        }
        Ok(settings)
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let settings = args.settings()?;
    let manager = ConnectionManager::new(&settings)?;
    tracing::info!(
        endpoint = %manager.endpoint(),
        reconnect_delay_ms = settings.reconnect_delay_ms,
        "starting segview"
    );
    let connection = manager.handle();
    let (ui_tx, ui_rx) = bounded::<UiEvent>(UI_EVENT_QUEUE);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("SegView")
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([720.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "SegView",
        options,
        Box::new(move |cc| {
            backend_bridge::runtime::launch(manager, ui_tx, cc.egui_ctx.clone())
                .context("failed to start backend worker")?;
            Ok(Box::new(SegViewApp::new(&cc.egui_ctx, connection, ui_rx)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("desktop shell failed: {err}"))
}
