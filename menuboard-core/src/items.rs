//! Per-category item processing: family-pack merge, ordering, and
//! day-of-week gating.

use crate::model::MenuItem;

use chrono::{Datelike, Local, Weekday};
use serde::Serialize;

/// Name marker for items only served on Saturday and Sunday.
pub const WEEKEND_MARKER: &str = "(weekend Spl)";

/// A menu item as it will be displayed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayItem {
    #[serde(flatten)]
    pub item: MenuItem,
    /// Price of the family-pack variant merged into this row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_price: Option<f64>,
}

impl DisplayItem {
    pub fn name(&self) -> &str {
        &self.item.name
    }
}

pub fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// Process one category's items for display on `today`.
///
/// A family-pack item whose name matches a regular item in the list is
/// folded into that item as `family_price` and not shown on its own. A
/// family-pack item with no regular counterpart stays in the list as a plain
/// row. Rows carrying a family price move to the end; both groups keep their
/// input order. Weekend specials are dropped on weekdays and shown without
/// the marker on weekends.
///
/// The input is only read, so calling this twice yields the same output.
pub fn process(items: &[MenuItem], today: Weekday) -> Vec<DisplayItem> {
    let family_price_of = |name: &str| {
        items
            .iter()
            .find(|f| f.is_family_pack() && f.name == name)
            .map(|f| f.price)
    };
    let has_regular = |name: &str| items.iter().any(|r| !r.is_family_pack() && r.name == name);

    let mut plain = Vec::with_capacity(items.len());
    let mut merged = Vec::new();

    for item in items {
        if item.is_family_pack() {
            if !has_regular(&item.name) {
                plain.push(DisplayItem {
                    item: item.clone(),
                    family_price: None,
                });
            }
            continue;
        }

        let family_price = family_price_of(&item.name);
        let row = DisplayItem {
            item: item.clone(),
            family_price,
        };
        if family_price.is_some() {
            merged.push(row);
        } else {
            plain.push(row);
        }
    }

    plain
        .into_iter()
        .chain(merged)
        .filter_map(|row| gate_weekend(row, today))
        .collect()
}

/// [`process`] against the local clock.
pub fn process_today(items: &[MenuItem]) -> Vec<DisplayItem> {
    process(items, Local::now().weekday())
}

fn gate_weekend(mut row: DisplayItem, today: Weekday) -> Option<DisplayItem> {
    if !row.item.name.contains(WEEKEND_MARKER) {
        return Some(row);
    }
    if !is_weekend(today) {
        return None;
    }
    row.item.name = strip_marker(&row.item.name);
    Some(row)
}

fn strip_marker(name: &str) -> String {
    name.replace(WEEKEND_MARKER, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
