//! Countpad: a small editor window whose status bar shows live word and
//! character counts.
//!
//! The GUI shell lives in the binary; everything it drives is here so it can
//! be tested without a window.

pub mod command;
pub mod config;
pub mod dialogs;
pub mod document;
pub mod highlight;
pub mod indent;
pub mod segment;
pub mod stats;
pub mod workflow;

pub use stats::TextStatistics;
