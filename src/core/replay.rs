//! Fast-forward replay of recorded host sessions.
//!
//! A scenario is a JSON array of host events (ticks, logins, var changes).
//! Ticks carry their own wall-clock time, so a week of play can be replayed
//! in microseconds and still cross every daily reset.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tasks::engine::{DailyTaskEngine, DailyTasksConfig};
use super::tasks::model::{Notification, TaskId};
use super::vars::{AccountType, GameVar, VarSnapshot};

/// One recorded host event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioStep {
    Tick { at: DateTime<Utc> },
    Login,
    Logout,
    Set { vars: HashMap<GameVar, i32> },
    Remove { var: GameVar },
    Account { account_type: Option<AccountType> },
    Toggle { task: TaskId, enabled: bool },
}

/// A reminder together with the tick that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayedNotification {
    pub at: DateTime<Utc>,
    pub notification: Notification,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scenario {
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn new(steps: Vec<ScenarioStep>) -> Self {
        Self { steps }
    }

    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(io::Error::from)
    }

    /// Run the scenario against a fresh engine starting from an empty snapshot.
    pub fn run(&self, config: DailyTasksConfig) -> Vec<ReplayedNotification> {
        self.run_from(VarSnapshot::new(), config)
    }

    pub fn run_from(&self, vars: VarSnapshot, config: DailyTasksConfig) -> Vec<ReplayedNotification> {
        let mut engine = DailyTaskEngine::new(vars, Vec::new(), config);
        let mut replayed = Vec::new();

        for step in &self.steps {
            match step {
                ScenarioStep::Tick { at } => {
                    let before = engine.sink().len();
                    engine.on_tick(at.timestamp_millis());
                    replayed.extend(engine.sink_mut().drain(before..).map(|notification| {
                        ReplayedNotification {
                            at: *at,
                            notification,
                        }
                    }));
                }
                ScenarioStep::Login => engine.on_login(),
                ScenarioStep::Logout => engine.on_logout(),
                ScenarioStep::Set { vars } => {
                    for (var, value) in vars {
                        engine.vars_mut().set(*var, *value);
                    }
                }
                ScenarioStep::Remove { var } => {
                    engine.vars_mut().remove(*var);
                }
                ScenarioStep::Account { account_type } => {
                    engine.vars_mut().set_account_type(*account_type);
                }
                ScenarioStep::Toggle { task, enabled } => {
                    let mut config = engine.config().clone();
                    config.set_enabled(*task, *enabled);
                    engine.update_config(config);
                }
            }
        }

        log::debug!(
            "Replayed {} steps, {} reminder(s)",
            self.steps.len(),
            replayed.len()
        );
        replayed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tasks::definitions::{SAND_MESSAGE, SAND_QUEST_COMPLETE};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SCENARIO: &str = r#"[
        {"kind": "set", "vars": {"membership_status": 1, "quest_the_hand_in_the_sand": 160, "daily_sand_collected": 0}},
        {"kind": "tick", "at": "2025-03-01T10:00:00Z"},
        {"kind": "tick", "at": "2025-03-01T10:00:00.600Z"},
        {"kind": "set", "vars": {"daily_sand_collected": 84}},
        {"kind": "tick", "at": "2025-03-01T23:59:59Z"},
        {"kind": "tick", "at": "2025-03-02T00:00:01Z"},
        {"kind": "toggle", "task": "sand", "enabled": false},
        {"kind": "login"},
        {"kind": "tick", "at": "2025-03-02T00:01:00Z"}
    ]"#;

    #[test]
    fn test_load_and_run_scenario() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SCENARIO.as_bytes()).unwrap();

        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.steps.len(), 9);

        let replayed = scenario.run(DailyTasksConfig::default_enabled());
        let times: Vec<String> = replayed.iter().map(|r| r.at.to_rfc3339()).collect();
        assert_eq!(
            times,
            vec!["2025-03-01T10:00:00+00:00", "2025-03-02T00:00:01+00:00"]
        );
        assert!(replayed.iter().all(|r| r.notification.message == SAND_MESSAGE));
    }

    fn demo_path(name: &str) -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
    }

    #[test]
    fn test_bundled_demo_scenario() {
        use crate::core::tasks::definitions::{BONEMEAL_MESSAGE, HERB_BOX_MESSAGE, STAVES_MESSAGE};

        let scenario = Scenario::load(demo_path("two_days.json")).unwrap();
        let replayed = scenario.run(DailyTasksConfig::default_enabled());
        let messages: Vec<&str> = replayed
            .iter()
            .map(|r| r.notification.message.as_str())
            .collect();

        // Login pass, then nothing after collecting, then the midnight reset
        assert_eq!(
            messages,
            vec![
                HERB_BOX_MESSAGE,
                STAVES_MESSAGE,
                BONEMEAL_MESSAGE,
                HERB_BOX_MESSAGE,
                STAVES_MESSAGE,
                BONEMEAL_MESSAGE,
            ]
        );
        assert!(replayed[3..]
            .iter()
            .all(|r| r.at.to_rfc3339() == "2025-03-02T00:00:01+00:00"));
    }

    #[test]
    fn test_bundled_demo_vars() {
        let vars = VarSnapshot::load(demo_path("vars.json")).unwrap();
        let scenario = Scenario::new(vec![ScenarioStep::Tick {
            at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        }]);

        let replayed = scenario.run_from(vars, DailyTasksConfig::default_enabled());
        let tasks: Vec<TaskId> = replayed.iter().map(|r| r.notification.task_id).collect();
        assert_eq!(tasks, vec![TaskId::Sand, TaskId::Flax]);
    }

    #[test]
    fn test_account_step() {
        let scenario = Scenario::new(vec![
            ScenarioStep::Account {
                account_type: Some(AccountType::UltimateIronman),
            },
            ScenarioStep::Set {
                vars: HashMap::from([
                    (GameVar::MembershipStatus, 1),
                    (GameVar::NmzRewardPoints, 20_000),
                    (GameVar::DailyHerbBoxesCollected, 0),
                ]),
            },
            ScenarioStep::Tick {
                at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            },
        ]);

        assert!(scenario.run(DailyTasksConfig::default_enabled()).is_empty());
    }

    #[test]
    fn test_removed_var_stops_reminder() {
        let vars = VarSnapshot::new()
            .with(GameVar::MembershipStatus, 1)
            .with(GameVar::QuestTheHandInTheSand, SAND_QUEST_COMPLETE)
            .with(GameVar::DailySandCollected, 0);
        let scenario = Scenario::new(vec![
            ScenarioStep::Remove {
                var: GameVar::DailySandCollected,
            },
            ScenarioStep::Tick {
                at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            },
        ]);

        assert!(scenario
            .run_from(vars, DailyTasksConfig::default_enabled())
            .is_empty());
    }
}
