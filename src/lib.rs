//! Terminal app launcher: browse a catalog of applications, then install or
//! open them with per-platform actions, deep-link fallbacks and an offline
//! copy of the catalog.

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod launch;
pub mod registry;
pub mod system;
pub mod ui;
pub mod utils;
