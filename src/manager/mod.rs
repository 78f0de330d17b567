//! Main settings manager module
//!
//! This module contains the [`SettingsManager`] struct which is the primary entry point
//! for reading, writing and persisting settings.

mod builder;
pub(crate) mod core;
mod io;
mod operations;

pub use builder::SettingsManagerBuilder;
pub use self::core::SettingsManager;
pub use io::FlushReport;
