#![warn(clippy::all, rust_2018_idioms)]
//! Breadboard-style editor for a single Arduino board with LEDs and push buttons.
//!
//! The circuit model, pin bookkeeping, simulation and sketch generation work
//! without any UI; [`App`] is the egui shell on top.

pub mod app;
pub mod codegen;
pub mod config;
pub mod db;
pub mod drag;
pub mod export;
pub mod pins;
pub mod simulator;
pub use app::App;
