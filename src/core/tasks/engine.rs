// Daily task engine - drives the reset clock and evaluates the task table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::definitions::TASKS;
use super::model::{Notification, NotificationSink, TaskConfig, TaskId};
use crate::core::clock::{ResetClock, ResetSignal};
use crate::core::vars::{GameVar, VarReader};

/// Daily task configuration - persisted in settings.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTasksConfig {
    /// Per-task configuration (enabled flag)
    #[serde(default)]
    pub tasks: HashMap<TaskId, TaskConfig>,
    /// Re-run the task table on every tick, not only after login or reset.
    /// A task whose counter never changes will then be reported every tick.
    #[serde(default)]
    pub recheck_every_tick: bool,
}

impl DailyTasksConfig {
    /// Create config with all tasks enabled
    pub fn default_enabled() -> Self {
        let mut tasks = HashMap::new();
        for task_id in TaskId::all() {
            tasks.insert(*task_id, TaskConfig::default());
        }
        Self {
            tasks,
            recheck_every_tick: false,
        }
    }

    /// Check if a specific task is enabled
    pub fn is_enabled(&self, task_id: TaskId) -> bool {
        self.tasks.get(&task_id).map(|c| c.enabled).unwrap_or(false)
    }

    pub fn set_enabled(&mut self, task_id: TaskId, enabled: bool) {
        self.tasks.entry(task_id).or_default().enabled = enabled;
    }
}

/// Evaluate every enabled task in declaration order.
///
/// Tasks whose inputs are missing are skipped without affecting the others.
pub fn evaluate(vars: &dyn VarReader, config: &DailyTasksConfig, reset: bool) -> Vec<Notification> {
    let mut notifications = Vec::new();

    for def in TASKS {
        if !config.is_enabled(def.id) {
            continue;
        }

        match def.is_collectible(vars, reset) {
            Some(true) => notifications.push(Notification {
                task_id: def.id,
                message: def.message.to_string(),
            }),
            Some(false) => {}
            None => log::debug!("Skipping {:?}: input unavailable", def.id),
        }
    }

    notifications
}

/// Daily task engine state.
///
/// Owns the host capabilities it was built with: a var reader for fresh
/// counters and a sink for outgoing reminders.
pub struct DailyTaskEngine<R, S> {
    config: DailyTasksConfig,
    clock: ResetClock,
    vars: R,
    sink: S,
}

impl<R: VarReader, S: NotificationSink> DailyTaskEngine<R, S> {
    /// A new engine starts with a login check pending.
    pub fn new(vars: R, sink: S, config: DailyTasksConfig) -> Self {
        Self::with_clock(vars, sink, config, ResetClock::new())
    }

    pub fn with_clock(vars: R, sink: S, config: DailyTasksConfig, clock: ResetClock) -> Self {
        Self {
            config,
            clock,
            vars,
            sink,
        }
    }

    /// Update the engine configuration (takes effect on the next tick)
    pub fn update_config(&mut self, config: DailyTasksConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &DailyTasksConfig {
        &self.config
    }

    pub fn clock(&self) -> &ResetClock {
        &self.clock
    }

    pub fn vars(&self) -> &R {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut R {
        &mut self.vars
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Host login: the next member tick evaluates unconditionally.
    pub fn on_login(&mut self) {
        self.clock.force_next_check();
    }

    /// Host logout or shutdown: forget the current window.
    pub fn on_logout(&mut self) {
        self.clock.on_reset();
    }

    /// Handle one game tick. Returns the number of reminders delivered.
    pub fn on_tick(&mut self, now_millis: i64) -> usize {
        // Daily tasks only exist for members; keep any pending login check
        // until membership is visible.
        if self.vars.var(GameVar::MembershipStatus) != Some(1) {
            return 0;
        }

        let signal = self.clock.observe(now_millis);
        if !signal.should_evaluate() && !self.config.recheck_every_tick {
            return 0;
        }

        self.run_pass(signal)
    }

    fn run_pass(&mut self, signal: ResetSignal) -> usize {
        let notifications = evaluate(&self.vars, &self.config, signal.boundary_crossed);
        let count = notifications.len();

        if signal.should_evaluate() {
            log::debug!(
                "Daily task pass (reset: {}, login: {}) produced {} reminder(s)",
                signal.boundary_crossed,
                signal.forced,
                count
            );
        }

        for notification in notifications {
            self.sink.notify(notification);
        }
        count
    }
}
