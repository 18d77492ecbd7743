//! The viewport provider.
//!
//! The rendering surface owns the real screen; it reports measured sizes
//! and the layout is recomputed from the latest one. Reporting the same
//! size twice is a no-op.

use menuboard_core::Rect;
use tokio::sync::watch;

#[derive(Debug)]
pub struct ViewportProvider {
    tx: watch::Sender<Rect>,
}

impl ViewportProvider {
    pub fn new(initial: Rect) -> (Self, watch::Receiver<Rect>) {
        let (tx, rx) = watch::channel(initial);
        (Self { tx }, rx)
    }

    pub fn subscribe(&self) -> watch::Receiver<Rect> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Rect {
        *self.tx.borrow()
    }

    /// Record a measurement. Returns true when it differs from the last one.
    /// Non-finite or negative sizes are ignored.
    pub fn measure(&self, width: f64, height: f64) -> bool {
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            tracing::warn!(width, height, "ignoring invalid viewport measurement");
            return false;
        }
        let next = Rect::sized(width, height);
        let changed = self.tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            tracing::debug!(width, height, "viewport resized");
        }
        changed
    }
}
