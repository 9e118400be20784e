use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::core::{
    config::{ConfigManager, Settings},
    replay::Scenario,
    tasks::{
        engine::DailyTaskEngine,
        model::{LogSink, NotificationSink},
    },
    vars::VarSnapshot,
};

#[derive(Debug, Parser)]
#[command(name = "daily-tasks", version, about = "Daily task reminders for the game client")]
struct Cli {
    /// Directory holding settings.json
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Tick continuously against the host's var snapshot file
    Watch,
    /// Replay a recorded scenario and print every reminder
    Replay {
        /// Scenario JSON file
        scenario: PathBuf,
    },
    /// Write the current (or default) settings back to disk
    InitConfig,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Also installs the log -> tracing bridge for the core's `log` records
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn run() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let config_dir = cli.config_dir.unwrap_or_else(ConfigManager::default_dir);
    let config_manager = ConfigManager::new(config_dir);

    let result = match cli.command {
        Command::Watch => watch(config_manager),
        Command::Replay { scenario } => replay(&config_manager, scenario),
        Command::InitConfig => {
            let settings = config_manager.load();
            config_manager.save(&settings).map(|()| {
                log::info!("Settings written to {:?}", config_manager.path());
            })
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn replay(config_manager: &ConfigManager, path: PathBuf) -> std::io::Result<()> {
    let settings = config_manager.load();
    let scenario = Scenario::load(&path)?;
    log::info!("Replaying {} steps from {:?}", scenario.steps.len(), path);

    for replayed in scenario.run(settings.daily_tasks) {
        println!(
            "[{}] {}",
            replayed.at.format("%Y.%m.%d %H:%M:%S"),
            replayed.notification.message
        );
    }
    Ok(())
}

/// State carried between live ticks.
struct WatchState {
    vars_path: PathBuf,
    tick_millis: u64,
    /// Last settings error reported, so a broken file is only warned about once
    settings_error: Option<String>,
}

impl WatchState {
    fn new(settings: &Settings) -> Self {
        Self {
            vars_path: settings.vars_path.clone(),
            tick_millis: settings.tick_millis.max(1),
            settings_error: None,
        }
    }

    /// One live tick: hot-reload settings, refresh the var snapshot and drive
    /// the engine. Returns the number of reminders delivered.
    ///
    /// Broken settings keep the previous configuration in effect.
    fn tick<S: NotificationSink>(
        &mut self,
        config_manager: &ConfigManager,
        engine: &mut DailyTaskEngine<VarSnapshot, S>,
        now_millis: i64,
    ) -> usize {
        match config_manager.try_load() {
            Ok(settings) => {
                if self.settings_error.take().is_some() {
                    log::info!("Settings in {:?} readable again", config_manager.path());
                }
                self.apply(settings, engine);
            }
            Err(e) => {
                let message = e.to_string();
                if self.settings_error.as_deref() == Some(message.as_str()) {
                    log::debug!("Settings still invalid: {}", message);
                } else {
                    log::warn!(
                        "Invalid settings in {:?}, keeping previous: {}",
                        config_manager.path(),
                        message
                    );
                    self.settings_error = Some(message);
                }
            }
        }

        // Missing or unreadable snapshot: every input is unavailable
        let snapshot = match VarSnapshot::load(&self.vars_path) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::trace!("No var snapshot at {:?}: {}", self.vars_path, e);
                VarSnapshot::new()
            }
        };
        *engine.vars_mut() = snapshot;

        engine.on_tick(now_millis)
    }

    fn apply<S: NotificationSink>(
        &mut self,
        settings: Settings,
        engine: &mut DailyTaskEngine<VarSnapshot, S>,
    ) {
        if settings.vars_path != self.vars_path {
            log::info!("Var snapshot moved to {:?}", settings.vars_path);
            self.vars_path = settings.vars_path;
            // A different snapshot is a different session
            engine.on_logout();
        }
        self.tick_millis = settings.tick_millis.max(1);
        engine.update_config(settings.daily_tasks);
    }
}

fn watch(config_manager: ConfigManager) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let settings = config_manager.load();
        let mut state = WatchState::new(&settings);
        let mut engine = DailyTaskEngine::new(VarSnapshot::new(), LogSink, settings.daily_tasks);
        let mut tick_millis = state.tick_millis;
        let mut interval = tokio::time::interval(Duration::from_millis(tick_millis));

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        log::info!("Watching var snapshot {:?}", state.vars_path);

        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = &mut ctrl_c => {
                    engine.on_logout();
                    log::info!("Stopped");
                    return Ok(());
                }
            }

            state.tick(&config_manager, &mut engine, Utc::now().timestamp_millis());

            if state.tick_millis != tick_millis {
                tick_millis = state.tick_millis;
                interval = tokio::time::interval(Duration::from_millis(tick_millis));
            }
        }
    })
}
