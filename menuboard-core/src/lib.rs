//! # Menuboard Core
//!
//! Everything a signage display needs between "a snapshot arrived" and
//! "here is where every header and item goes":
//!
//! - [`geometry`] resolves screen rotation from the native aspect and the
//!   device's intended orientation.
//! - [`items`] merges family-pack variants and applies weekend gating.
//! - [`layout`] turns a category-filtered menu into a placement plan.
//! - [`sync`] reconciles the local device against the published snapshot.
//! - [`vault`] persists the device identity.

pub mod error;
pub mod format;
pub mod geometry;
pub mod items;
pub mod layout;
pub mod model;
pub mod sync;
pub mod vault;

// Re-export the types every consumer touches so they can just use `menuboard_core::Device`
pub use error::SyncError;
pub use geometry::{Orientation, Rect, Rotation, Stage, Transform};
pub use items::DisplayItem;
pub use layout::{LayoutConfig, LayoutMode, LayoutPlan};
pub use model::{Category, Device, Menu, MenuItem, MenuSection, SheetData};
pub use sync::{MenuView, SheetSource, SyncMachine, SyncState};
pub use vault::{LocalState, Vault};
