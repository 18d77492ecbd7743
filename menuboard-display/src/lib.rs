//! Menuboard display library target.
//!
//! Exposes the display's modules for integration tests. The binary entry
//! point is in `main.rs`.

pub mod app;
pub mod config;
pub mod inbound;
pub mod measure;
pub mod presenter;
pub mod scene;
pub mod util;
pub mod viewport;
