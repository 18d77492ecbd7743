//! The published snapshot and everything in it.
//!
//! All of these are immutable once fetched. A new snapshot replaces the old
//! one wholesale; nothing here is ever patched in place.

use crate::format::format_title;
use crate::geometry::Orientation;

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════
// Enumerations
// ════════════════════════════════════════════════════════════════════

/// The closed set of menu categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Appetizers,
    Beverages,
    Biryani,
    Breads,
    Chaats,
    Curries,
    DeliItems,
    Dosas,
    #[serde(rename = "pulav's")]
    Pulavs,
    Sides,
    Specials,
    Tandoori,
    Tiffins,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Appetizers,
        Category::Beverages,
        Category::Biryani,
        Category::Breads,
        Category::Chaats,
        Category::Curries,
        Category::DeliItems,
        Category::Dosas,
        Category::Pulavs,
        Category::Sides,
        Category::Specials,
        Category::Tandoori,
        Category::Tiffins,
    ];

    /// The wire identifier, e.g. `"deli-items"`.
    pub fn slug(self) -> &'static str {
        match self {
            Category::Appetizers => "appetizers",
            Category::Beverages => "beverages",
            Category::Biryani => "biryani",
            Category::Breads => "breads",
            Category::Chaats => "chaats",
            Category::Curries => "curries",
            Category::DeliItems => "deli-items",
            Category::Dosas => "dosas",
            Category::Pulavs => "pulav's",
            Category::Sides => "sides",
            Category::Specials => "specials",
            Category::Tandoori => "tandoori",
            Category::Tiffins => "tiffins",
        }
    }

    /// Display title derived from the slug, e.g. `"Deli Items"`.
    pub fn title(self) -> String {
        format_title(self.slug())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    #[default]
    Available,
    SoldOut,
    ComingSoon,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Diet {
    Vegetarian,
    NonVegetarian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tag {
    Popular,
    New,
    FamilyPack,
}

// ════════════════════════════════════════════════════════════════════
// Records
// ════════════════════════════════════════════════════════════════════

/// One row of the menu sheet. `name` is not unique on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "price")]
    pub price: f64,
    pub category: Category,
    #[serde(default)]
    pub availability: Availability,
    pub diet: Diet,
    #[serde(default, deserialize_with = "lenient_list")]
    pub tags: Vec<Tag>,
}

impl MenuItem {
    pub fn is_family_pack(&self) -> bool {
        self.tags.contains(&Tag::FamilyPack)
    }
}

/// One physical display as configured by an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub name: String,
    pub device_id: String,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub invert: bool,
    #[serde(default, deserialize_with = "lenient_list")]
    pub categories: Vec<Category>,
}

impl Device {
    /// The record the registration endpoint appends for a new display:
    /// portrait, not inverted, no categories until an operator edits it.
    pub fn unconfigured(device_id: &str) -> Self {
        let short: String = device_id.chars().take(4).collect();
        Self {
            name: format!("device-{}", short),
            device_id: device_id.to_string(),
            orientation: Orientation::Portrait,
            invert: false,
            categories: Vec::new(),
        }
    }
}

/// The full published dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetData {
    #[serde(default, deserialize_with = "lenient_list")]
    pub devices: Vec<Device>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub menu_items: Vec<MenuItem>,
}

impl SheetData {
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty() && self.menu_items.is_empty()
    }

    /// First device whose id matches. Later duplicates are ignored.
    pub fn find_device(&self, device_id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.device_id == device_id)
    }

    /// The category-filtered menu for `device`, in the device's category
    /// order. A category listed twice is shown once, at its first position.
    /// A category with no items still gets an (empty) section.
    pub fn menu_for(&self, device: &Device) -> Menu {
        let mut sections: Vec<MenuSection> = Vec::with_capacity(device.categories.len());

        for &category in &device.categories {
            if sections.iter().any(|s| s.category == category) {
                continue;
            }
            let items = self
                .menu_items
                .iter()
                .filter(|item| item.category == category)
                .cloned()
                .collect();
            sections.push(MenuSection { category, items });
        }

        Menu { sections }
    }
}

// ════════════════════════════════════════════════════════════════════
// Derived menu
// ════════════════════════════════════════════════════════════════════

/// Ordered category → items mapping handed to the layout engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Menu {
    pub sections: Vec<MenuSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuSection {
    pub category: Category,
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.sections.iter().map(|s| s.category)
    }

    pub fn get(&self, category: Category) -> Option<&[MenuItem]> {
        self.sections
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.items.as_slice())
    }
}

// ────────────────────────────────────────────────────────────────
// Lenient decoding
// ────────────────────────────────────────────────────────────────

/// Decode a list element by element, dropping entries that do not parse.
/// `null` or a missing field decode as an empty list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();

    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(
                    kind = std::any::type_name::<T>(),
                    error = %e,
                    "dropping malformed snapshot entry"
                );
                None
            }
        })
        .collect())
}

/// Prices arrive as numbers, or as numeric strings when a sheet cell is
/// formatted as text. Negative and non-finite values are rejected.
fn price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let value = match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s
            .trim()
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .map_err(serde::de::Error::custom)?,
    };

    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "price must be a non-negative number, got {}",
            value
        )));
    }
    Ok(value)
}
