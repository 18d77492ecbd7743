//! What the rendering surface is told to draw.

use crate::measure::MeasurementMap;

use chrono::Weekday;
use menuboard_core::layout::{self, LayoutConfig, LayoutPlan};
use menuboard_core::{Rect, Stage, SyncState};
use serde::Serialize;

pub const LOADING_MESSAGE: &str = "Loading...";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scene", rename_all = "lowercase")]
pub enum Scene {
    Loading {
        message: String,
    },
    Error {
        message: String,
    },
    Menu {
        device: String,
        stage: Stage,
        plan: LayoutPlan,
    },
}

impl Scene {
    pub fn is_menu(&self) -> bool {
        matches!(self, Scene::Menu { .. })
    }

    /// Correct the predicted sides of a balanced plan from what the surface
    /// measured. Flow plans carry absolute rects and are left alone.
    /// Returns how many elements the measurements matched.
    pub fn apply_measurements(&mut self, measured: &MeasurementMap) -> usize {
        let Scene::Menu {
            stage,
            plan: LayoutPlan::Balanced(plan),
            ..
        } = self
        else {
            return 0;
        };

        let mut applied = 0;
        for (key, rect) in measured {
            if plan.apply_measurement(*key, *rect, stage) {
                applied += 1;
            }
        }
        applied
    }
}

/// Pure function of the sync state, the latest viewport and the day.
pub fn render(state: &SyncState, viewport: Rect, config: &LayoutConfig, today: Weekday) -> Scene {
    match state {
        SyncState::Loading => Scene::Loading {
            message: LOADING_MESSAGE.to_string(),
        },
        SyncState::Error(err) => Scene::Error {
            message: err.display_message().to_string(),
        },
        SyncState::Success(view) => {
            let stage = Stage::for_device(viewport, &view.device);
            Scene::Menu {
                device: view.device.name.clone(),
                plan: layout::layout(&view.menu, &stage, config, today),
                stage,
            }
        }
    }
}
