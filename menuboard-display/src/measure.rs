//! Element positions reported back by the rendering surface.
//!
//! In balanced mode the surface flows blocks into columns itself, so the
//! side each header or item finally lands on is only known after it has
//! drawn. Measurements are kept per element until the scene they describe is
//! replaced.

use menuboard_core::Rect;
use menuboard_core::layout::ElementKey;
use std::collections::HashMap;
use tokio::sync::watch;

pub type MeasurementMap = HashMap<ElementKey, Rect>;

#[derive(Debug)]
pub struct Measurements {
    tx: watch::Sender<MeasurementMap>,
}

impl Measurements {
    pub fn new() -> (Self, watch::Receiver<MeasurementMap>) {
        let (tx, rx) = watch::channel(MeasurementMap::new());
        (Self { tx }, rx)
    }

    pub fn subscribe(&self) -> watch::Receiver<MeasurementMap> {
        self.tx.subscribe()
    }

    pub fn get(&self, key: ElementKey) -> Option<Rect> {
        self.tx.borrow().get(&key).copied()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    /// Record where `key` was drawn. Returns true when this changes anything.
    pub fn record(&self, key: ElementKey, rect: Rect) -> bool {
        self.tx.send_if_modified(|map| {
            if map.get(&key) == Some(&rect) {
                false
            } else {
                map.insert(key, rect);
                true
            }
        })
    }

    /// Forget every measurement. Called whenever the scene is rebuilt from a
    /// new state or viewport.
    pub fn reset(&self) -> bool {
        self.tx.send_if_modified(|map| {
            if map.is_empty() {
                false
            } else {
                map.clear();
                true
            }
        })
    }
}
