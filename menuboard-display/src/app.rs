//! Boot logic and the main loop.
//!
//! Wires the pieces together:
//! invalidation → sync machine → (state, viewport) → scene → stdout,
//! with element measurements from the surface folded back into the scene.

use crate::config::DisplayConfig;
use crate::inbound;
use crate::measure::Measurements;
use crate::presenter::Presenter;
use crate::scene;
use crate::viewport::ViewportProvider;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use menuboard_core::{SyncMachine, Vault};
use menuboard_hive::{SHEET_CHANNEL, SignalHub, spawn_ticker};
use menuboard_net::SheetClient;

use std::sync::Arc;
use std::time::Duration;

/// How often the day is re-checked so weekend specials appear at midnight.
const CLOCK_PERIOD: Duration = Duration::from_secs(60);

pub async fn run(config: DisplayConfig) -> Result<()> {
    tracing::info!(api = %config.api_base, mode = ?config.layout.mode, "display starting");

    // 1. Collaborators
    let client = Arc::new(SheetClient::new(&config.api_base));
    let state_path = config.state_path();
    if let Some(dir) = state_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let vault = Arc::new(
        Vault::open(&state_path)
            .with_context(|| format!("Failed to open vault at {}", state_path.display()))?,
    );

    // 2. Invalidation hub, and the fallback ticker if configured
    let hub = Arc::new(SignalHub::new());
    let ticker = (config.refresh_interval_secs > 0).then(|| {
        spawn_ticker(
            hub.clone(),
            Duration::from_secs(config.refresh_interval_secs),
        )
    });

    // 3. Sync machine
    let machine = SyncMachine::new(client, vault);
    let mut state_rx = machine.subscribe();
    let sync_task = tokio::spawn(machine.run(hub.subscribe(SHEET_CHANNEL)));

    // 4. Viewport and element measurements, fed from the surface
    let (viewport, mut viewport_rx) = ViewportProvider::new(config.viewport.rect());
    let viewport = Arc::new(viewport);
    let (measurements, mut measured_rx) = Measurements::new();
    let measurements = Arc::new(measurements);
    let stdin_task =
        inbound::spawn_stdin_reader(viewport.clone(), hub.clone(), measurements.clone());

    // 5. Pump: re-render whenever anything it depends on changes
    let mut presenter = Presenter::new(std::io::stdout());
    let mut clock = tokio::time::interval(CLOCK_PERIOD);

    loop {
        let scene = {
            let state = state_rx.borrow_and_update();
            let rect = *viewport_rx.borrow_and_update();
            let mut scene = scene::render(&state, rect, &config.layout, Local::now().weekday());
            scene.apply_measurements(&measured_rx.borrow_and_update());
            scene
        };
        if presenter.present(scene)? {
            tracing::debug!(written = presenter.written(), "scene presented");
        }

        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    tracing::warn!("sync machine stopped");
                    break;
                }
                measurements.reset();
            }
            changed = viewport_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                measurements.reset();
            }
            changed = measured_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = clock.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                break;
            }
        }
    }

    // A fetch in flight has no timeout, so the sync task is aborted rather
    // than awaited.
    hub.close();
    sync_task.abort();
    stdin_task.abort();
    if let Some(ticker) = ticker {
        ticker.abort();
    }
    Ok(())
}
