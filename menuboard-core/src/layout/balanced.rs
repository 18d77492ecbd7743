//! Balanced two-column flow.
//!
//! Each category (header plus items) is an atomic block. Blocks fill the
//! left column first, then the right, with the split chosen the way a
//! balanced multi-column container does it: the shortest column height that
//! still fits everything, with the left column taking as much as fits.
//!
//! Every header and item carries the side of the screen it lands on, which
//! selects its palette. The side predicted here can be corrected from the
//! offsets the rendering surface actually measured, see
//! [`BalancedPlan::apply_measurement`].

use super::{Header, ItemLabel, LayoutConfig, Section, OVERFLOW_EPSILON};
use crate::geometry::{Rect, Rotation, Stage};
use crate::model::Category;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// Left half draws background-colored text on the primary color; right
/// half draws foreground text on the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Inverse,
    Standard,
}

impl Side {
    /// Which half a horizontal offset falls in.
    pub fn from_offset(offset: f64, screen: Rect) -> Self {
        if offset >= screen.x + screen.width / 2.0 {
            Side::Right
        } else {
            Side::Left
        }
    }

    /// Which half a measured element is in.
    ///
    /// The surface measures bounding boxes in the physical (unrotated)
    /// viewport. The logical left edge of the element is recovered from the
    /// rotation about the viewport center:
    ///
    /// | rotation | logical x                          |
    /// |----------|------------------------------------|
    /// | 0        | `x`                                |
    /// | 90       | `y`                                |
    /// | -90      | `viewport.height - (y + height)`   |
    /// | 180      | `viewport.width - (x + width)`     |
    pub fn of_measured(measured: Rect, stage: &Stage) -> Self {
        let viewport = stage.viewport;
        let offset = match stage.transform.rotation {
            Rotation::None => measured.x - viewport.x,
            Rotation::Clockwise => measured.y - viewport.y,
            Rotation::CounterClockwise => viewport.bottom() - measured.bottom(),
            Rotation::HalfTurn => viewport.right() - measured.right(),
        };
        Self::from_offset(stage.screen.x + offset, stage.screen)
    }

    pub fn palette(self) -> Palette {
        match self {
            Side::Left => Palette::Inverse,
            Side::Right => Palette::Standard,
        }
    }
}

/// Content tagged with the side of the screen it renders on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toned<T> {
    #[serde(flatten)]
    pub content: T,
    pub is_right: bool,
    pub palette: Palette,
}

impl<T> Toned<T> {
    fn new(content: T, side: Side) -> Self {
        let mut toned = Self {
            content,
            is_right: false,
            palette: Palette::Inverse,
        };
        toned.set_side(side);
        toned
    }

    pub fn side(&self) -> Side {
        if self.is_right { Side::Right } else { Side::Left }
    }

    fn set_side(&mut self, side: Side) {
        self.is_right = side == Side::Right;
        self.palette = side.palette();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub category: Category,
    pub column: usize,
    /// Predicted block bounds in the logical frame.
    pub rect: Rect,
    pub header: Toned<Header>,
    pub items: Vec<Toned<ItemLabel>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancedPlan {
    pub screen: Rect,
    pub column_width: f64,
    /// Height of the taller column after balancing.
    pub column_height: f64,
    pub blocks: Vec<Block>,
}

/// Addresses one element of a balanced plan.
///
/// On the wire: `{"header": "dosas"}` or `{"item": ["dosas", 2]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKey {
    Header(Category),
    Item(Category, usize),
}

impl BalancedPlan {
    pub fn block(&self, category: Category) -> Option<&Block> {
        self.blocks.iter().find(|b| b.category == category)
    }

    /// Re-derive one element's side from where the surface actually put it.
    /// Returns false when the key does not name an element of this plan.
    pub fn apply_measurement(&mut self, key: ElementKey, measured: Rect, stage: &Stage) -> bool {
        let side = Side::of_measured(measured, stage);
        let category = match key {
            ElementKey::Header(c) | ElementKey::Item(c, _) => c,
        };
        let Some(block) = self.blocks.iter_mut().find(|b| b.category == category) else {
            return false;
        };

        match key {
            ElementKey::Header(_) => {
                block.header.set_side(side);
                true
            }
            ElementKey::Item(_, index) => match block.items.get_mut(index) {
                Some(item) => {
                    item.set_side(side);
                    true
                }
                None => false,
            },
        }
    }
}

/// Split `heights` into a left prefix and right suffix.
///
/// Returns the number of blocks in the left column and the balanced column
/// height: the smallest achievable height of the taller column, with ties
/// resolved toward a fuller left column.
pub fn balance(heights: &[f64]) -> (usize, f64) {
    let total: f64 = heights.iter().sum();

    let mut prefix = Vec::with_capacity(heights.len() + 1);
    let mut running = 0.0;
    prefix.push(running);
    for h in heights {
        running += h;
        prefix.push(running);
    }

    let column_height = prefix
        .iter()
        .map(|left| left.max(total - left))
        .fold(f64::INFINITY, f64::min);

    let split = (0..prefix.len())
        .rev()
        .find(|&k| prefix[k] <= column_height + OVERFLOW_EPSILON)
        .unwrap_or(0);

    (split, column_height)
}

pub fn place(sections: &[Section], stage: &Stage, config: &LayoutConfig) -> BalancedPlan {
    let screen = stage.screen;
    let column_width = screen.width / 2.0;
    let item_height = config.item_height(screen);
    let header_height = config.header_height(screen);

    let heights: Vec<f64> = sections
        .iter()
        .map(|s| header_height + s.items.len() as f64 * item_height)
        .collect();
    let (split, column_height) = balance(&heights);

    let mut blocks = Vec::with_capacity(sections.len());
    let mut y = 0.0;

    for (index, (section, height)) in sections.iter().zip(&heights).enumerate() {
        if index == split {
            y = 0.0;
        }
        let column = usize::from(index >= split);
        let rect = Rect::new(
            screen.x + column as f64 * column_width,
            screen.y + y,
            column_width,
            *height,
        );
        y += height;

        let side = Side::from_offset(rect.x, screen);
        let header_rect = Rect::new(rect.x, rect.y, rect.width, header_height);

        let items = section
            .items
            .iter()
            .map(|item| Toned::new(ItemLabel::new(section.category, item.clone()), side))
            .collect();

        blocks.push(Block {
            category: section.category,
            column,
            rect,
            header: Toned::new(Header::new(section.category, header_rect), side),
            items,
        });
    }

    BalancedPlan {
        screen,
        column_width,
        column_height,
        blocks,
    }
}
