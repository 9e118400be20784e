pub mod clock;
pub mod config;
pub mod replay;
pub mod tasks;
pub mod vars;
