//! Messages from the rendering surface on stdin, one JSON object per line.
//!
//! ```text
//! {"width":1080,"height":1920}                       viewport measured
//! {"topic":"sheet-channel","event":"sheet-updated"}  relayed push signal
//! {"key":{"header":"dosas"},"rect":{"x":0,"y":0,"width":108,"height":960}}
//!                                                    element measured
//! ```

use crate::measure::Measurements;
use crate::viewport::ViewportProvider;

use menuboard_core::Rect;
use menuboard_core::layout::ElementKey;
use menuboard_hive::{Signal, SignalHub};
use serde::Deserialize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Inbound {
    Signal(Signal),
    Viewport { width: f64, height: f64 },
    /// Physical bounding box of one balanced-mode element, as drawn.
    Measured { key: ElementKey, rect: Rect },
}

/// Where inbound messages go.
#[derive(Debug, Clone, Copy)]
pub struct Targets<'a> {
    pub viewport: &'a ViewportProvider,
    pub hub: &'a SignalHub,
    pub measurements: &'a Measurements,
}

/// Parse one line. Blank lines and garbage yield `None`.
pub fn parse_line(line: &str) -> Option<Inbound> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match serde_json::from_str(line) {
        Ok(msg) => Some(msg),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unrecognised input line");
            None
        }
    }
}

pub fn dispatch(msg: Inbound, targets: Targets<'_>) {
    match msg {
        Inbound::Viewport { width, height } => {
            targets.viewport.measure(width, height);
        }
        Inbound::Signal(signal) => {
            targets.hub.publish(signal);
        }
        Inbound::Measured { key, rect } => {
            if targets.measurements.record(key, rect) {
                tracing::trace!(?key, ?rect, "element measured");
            }
        }
    }
}

/// Feed stdin into the viewport provider, the hub and the measurement
/// store until EOF.
pub fn spawn_stdin_reader(
    viewport: Arc<ViewportProvider>,
    hub: Arc<SignalHub>,
    measurements: Arc<Measurements>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(msg) = parse_line(&line) {
                        let targets = Targets {
                            viewport: &viewport,
                            hub: &hub,
                            measurements: &measurements,
                        };
                        dispatch(msg, targets);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("stdin read failed: {:#}", e);
                    break;
                }
            }
        }
        tracing::debug!("stdin closed");
    })
}
