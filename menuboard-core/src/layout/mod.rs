//! Layout computations.
//!
//! Turns a category-filtered [`Menu`] and a [`Stage`] into a placement plan
//! for the rendering surface. Two strategies are supported:
//!
//! - [`LayoutMode::Flow`]: absolute rects, stacked top to bottom, spilling
//!   into the next column when the screen bottom is reached.
//! - [`LayoutMode::Balanced`]: categories as atomic blocks split across two
//!   balanced columns, with a left/right palette per element.
//!
//! Both are pure functions of the menu, the stage, the config and the day.

pub mod balanced;
pub mod flow;

pub use balanced::{BalancedPlan, Block, ElementKey, Palette, Side, Toned};
pub use flow::{Element, FlowPlan, Placement};

use crate::format::format_usd;
use crate::geometry::{Rect, Stage};
use crate::items::{self, DisplayItem};
use crate::model::{Category, Menu};

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Item height as a fraction of screen height.
pub const DEFAULT_ITEM_HEIGHT_FRACTION: f64 = 0.1 / 2.0;

/// A category header is this many item heights tall.
pub const HEADER_HEIGHT_FACTOR: f64 = 2.0;

/// Brush stroke width as a fraction of the header's cross-axis extent.
pub const BRUSH_WIDTH_FRACTION: f64 = 0.5;

/// Slack for accumulated floating-point error when testing against the
/// screen bottom.
pub const OVERFLOW_EPSILON: f64 = 1e-6;

// ────────────────────────────────────────────────────────────────
// Config
// ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    #[default]
    Flow,
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub mode: LayoutMode,
    pub item_height_fraction: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Flow,
            item_height_fraction: DEFAULT_ITEM_HEIGHT_FRACTION,
        }
    }
}

impl LayoutConfig {
    pub fn item_height(&self, screen: Rect) -> f64 {
        screen.height * self.item_height_fraction
    }

    pub fn header_height(&self, screen: Rect) -> f64 {
        self.item_height(screen) * HEADER_HEIGHT_FACTOR
    }
}

// ────────────────────────────────────────────────────────────────
// Elements
// ────────────────────────────────────────────────────────────────

/// A category title and its decorative brush stroke.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub category: Category,
    pub title: String,
    /// Brush bounding box, in the same frame as the header rect. Anchored at
    /// the header's left edge; the title text starts at its right edge.
    pub brush: Rect,
}

impl Header {
    fn new(category: Category, rect: Rect) -> Self {
        Self {
            category,
            title: category.title(),
            brush: brush_rect(rect),
        }
    }

    /// Where title text may be drawn: the header minus the brush.
    pub fn text_rect(&self, header: Rect) -> Rect {
        Rect::new(
            self.brush.right(),
            header.y,
            (header.right() - self.brush.right()).max(0.0),
            header.height,
        )
    }
}

/// An item row with its prices pre-formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemLabel {
    pub category: Category,
    pub item: DisplayItem,
    pub price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_price: Option<String>,
}

impl ItemLabel {
    fn new(category: Category, item: DisplayItem) -> Self {
        Self {
            category,
            price: format_usd(item.item.price),
            family_price: item.family_price.map(format_usd),
            item,
        }
    }
}

/// Headers only ever sit inside one column, so the brush is a fixed share of
/// the column width and never reaches a neighbouring column.
fn brush_rect(header: Rect) -> Rect {
    Rect::new(header.x, header.y, header.width * BRUSH_WIDTH_FRACTION, header.height)
}

// ────────────────────────────────────────────────────────────────
// Plan
// ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum LayoutPlan {
    Flow(FlowPlan),
    Balanced(BalancedPlan),
}

impl LayoutPlan {
    pub fn mode(&self) -> LayoutMode {
        match self {
            LayoutPlan::Flow(_) => LayoutMode::Flow,
            LayoutPlan::Balanced(_) => LayoutMode::Balanced,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            LayoutPlan::Flow(plan) => plan.placements.is_empty(),
            LayoutPlan::Balanced(plan) => plan.blocks.is_empty(),
        }
    }
}

/// A category with its items already processed for display.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub category: Category,
    pub items: Vec<DisplayItem>,
}

/// Run every section of `menu` through the item processor.
pub fn prepare(menu: &Menu, today: Weekday) -> Vec<Section> {
    menu.sections
        .iter()
        .map(|s| Section {
            category: s.category,
            items: items::process(&s.items, today),
        })
        .collect()
}

/// Compute the placement plan for `menu` on `stage`.
pub fn layout(menu: &Menu, stage: &Stage, config: &LayoutConfig, today: Weekday) -> LayoutPlan {
    let sections = prepare(menu, today);
    match config.mode {
        LayoutMode::Flow => LayoutPlan::Flow(flow::place(&sections, stage, config)),
        LayoutMode::Balanced => LayoutPlan::Balanced(balanced::place(&sections, stage, config)),
    }
}
