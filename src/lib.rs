#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Daily task reminders driven by game ticks and a daily reset boundary.
pub mod core;

pub mod app;
pub use app::run;
