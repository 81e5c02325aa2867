//! Runtime bridge between the control channel and the UI event queue.

use std::thread;

use anyhow::Context;
use client_core::{ClientEvent, ConnectionManager, FrameDecoder};
use crossbeam_channel::Sender;
use eframe::egui;
use tokio::sync::broadcast::error::RecvError;

use crate::controller::{events::UiEvent, orchestration::forward_ui_event};

pub fn launch(
    manager: ConnectionManager,
    ui_tx: Sender<UiEvent>,
    repaint: egui::Context,
) -> anyhow::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("segview-backend".into())
        .spawn(move || run_backend(manager, ui_tx, repaint))
        .context("failed to spawn backend thread")
}

fn run_backend(manager: ConnectionManager, ui_tx: Sender<UiEvent>, repaint: egui::Context) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("failed to build backend runtime: {err}");
            let _ = forward_ui_event(
                &ui_tx,
                &repaint,
                UiEvent::BackendFailed(format!("failed to build backend runtime: {err}")),
            );
            return;
        }
    };

    runtime.block_on(async move {
        let mut events = manager.subscribe_events();
        let connection = manager.spawn();
        let decoder = FrameDecoder::new();

        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "backend bridge lagged behind control channel");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let forwarded = match event {
                ClientEvent::ConnectionStateChanged(state) => {
                    forward_ui_event(&ui_tx, &repaint, UiEvent::Connection(state))
                }
                ClientEvent::StatsUpdated(stats) => {
                    forward_ui_event(&ui_tx, &repaint, UiEvent::Stats(stats))
                }
                ClientEvent::FrameReceived { image_b64 } => {
                    let ui_tx = ui_tx.clone();
                    let repaint = repaint.clone();
                    decoder.submit(image_b64, move |decoded| {
                        forward_ui_event(&ui_tx, &repaint, UiEvent::FrameDecoded(decoded));
                    });
                    true
                }
            };
            if !forwarded {
                tracing::info!("ui closed; stopping backend bridge");
                break;
            }
        }

        connection.abort();
    });
}
