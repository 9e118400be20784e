// Daily task reminders.
//
// Architecture:
// - model.rs: Task identifiers, per-task config and notification types
// - definitions.rs: The task table and its generic predicate evaluation
// - engine.rs: Reset-gated evaluation passes and notification dispatch

pub mod definitions;
pub mod engine;
pub mod model;
