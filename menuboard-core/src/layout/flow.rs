//! Flow/paging placement.
//!
//! Headers and items are stacked in one column until the next block would
//! cross the screen bottom, then placement continues at the top of the next
//! column. Portrait content uses two columns per screen, landscape four.

use super::{Header, ItemLabel, LayoutConfig, Section, OVERFLOW_EPSILON};
use crate::geometry::{Rect, Stage};

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowPlan {
    pub screen: Rect,
    pub column_width: f64,
    /// Number of columns used, including any that run past the screen edge.
    pub columns: usize,
    /// Headers and items in category-then-item order.
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub rect: Rect,
    pub column: usize,
    /// False when the rect falls outside the screen (the menu is longer
    /// than the screen can hold).
    pub visible: bool,
    pub element: Element,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Header(Header),
    Item(ItemLabel),
}

impl FlowPlan {
    pub fn headers(&self) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(|p| matches!(p.element, Element::Header(_)))
    }

    pub fn items(&self) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(|p| matches!(p.element, Element::Item(_)))
    }
}

/// Column width for the intended orientation.
pub fn column_width(stage: &Stage) -> f64 {
    if stage.is_portrait() {
        stage.screen.width / 2.0
    } else {
        stage.screen.width / 4.0
    }
}

struct Cursor {
    screen: Rect,
    width: f64,
    column: usize,
    y: f64,
}

impl Cursor {
    fn new(screen: Rect, width: f64) -> Self {
        Self {
            screen,
            width,
            column: 0,
            y: 0.0,
        }
    }

    /// Reserve `height` in the current column, or at the top of the next
    /// one if it would cross the bottom. An empty column always accepts the
    /// block, so a block taller than the screen does not skip columns.
    fn advance(&mut self, height: f64) -> Rect {
        if self.y > 0.0 && self.y + height > self.screen.height + OVERFLOW_EPSILON {
            self.column += 1;
            self.y = 0.0;
        }

        let rect = Rect::new(
            self.screen.x + self.column as f64 * self.width,
            self.screen.y + self.y,
            self.width,
            height,
        );
        self.y += height;
        rect
    }
}

pub fn place(sections: &[Section], stage: &Stage, config: &LayoutConfig) -> FlowPlan {
    let screen = stage.screen;
    let width = column_width(stage);
    let item_height = config.item_height(screen);
    let header_height = config.header_height(screen);

    let mut cursor = Cursor::new(screen, width);
    let mut placements = Vec::new();

    let mut push = |rect: Rect, column: usize, element: Element| {
        placements.push(Placement {
            rect,
            column,
            visible: screen.contains_rect(&rect, OVERFLOW_EPSILON),
            element,
        });
    };

    for section in sections {
        let rect = cursor.advance(header_height);
        push(
            rect,
            cursor.column,
            Element::Header(Header::new(section.category, rect)),
        );

        for item in &section.items {
            let rect = cursor.advance(item_height);
            push(
                rect,
                cursor.column,
                Element::Item(ItemLabel::new(section.category, item.clone())),
            );
        }
    }

    let columns = if placements.is_empty() {
        0
    } else {
        cursor.column + 1
    };

    FlowPlan {
        screen,
        column_width: width,
        columns,
        placements,
    }
}
