//! Garland Viewer - interactive scene viewer library
//!
//! This crate provides the `ViewerApp` application handler and the TOML
//! tuning file it is configured from.

mod app;
mod tuning;

pub use app::ViewerApp;
pub use tuning::ViewerTuning;
