#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use std::process::ExitCode;

fn main() -> ExitCode {
    daily_tasks::run()
}
