// Daily task model types for configuration and notifications.

use serde::{Deserialize, Serialize};

/// Unique identifier for each tracked daily task.
///
/// Declaration order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskId {
    /// Herb boxes bought with Nightmare Zone reward points
    HerbBoxes,
    /// Battlestaves from Zaff
    Staves,
    /// Pure essence from Wizard Cromperty
    Essence,
    /// Random runes from Lundail
    Runes,
    /// Buckets of sand from Bert
    Sand,
    /// Flax to bowstring conversion from the Flax keeper
    Flax,
    /// Bonemeal and slime from Robin
    Bonemeal,
    /// Dynamite from Thirus
    Dynamite,
}

impl TaskId {
    /// Get the display name for this task
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HerbBoxes => "Herb Boxes",
            Self::Staves => "Battlestaves",
            Self::Essence => "Essence",
            Self::Runes => "Random Runes",
            Self::Sand => "Sand",
            Self::Flax => "Flax",
            Self::Bonemeal => "Bonemeal",
            Self::Dynamite => "Dynamite",
        }
    }

    /// Get a description of what this reminder does
    pub fn description(&self) -> &'static str {
        match self {
            Self::HerbBoxes => "Remind when herb boxes can be bought from the NMZ reward shop",
            Self::Staves => "Remind when discounted battlestaves can be bought from Zaff",
            Self::Essence => "Remind when free essence can be collected from Wizard Cromperty",
            Self::Runes => "Remind when random runes can be collected from Lundail",
            Self::Sand => "Remind when buckets of sand can be collected from Bert",
            Self::Flax => "Remind when flax can be converted to bowstrings by the Flax keeper",
            Self::Bonemeal => "Remind when bonemeal and slime can be collected from Robin",
            Self::Dynamite => "Remind when dynamite can be collected from Thirus",
        }
    }

    /// Get all task IDs in evaluation order
    pub fn all() -> &'static [TaskId] {
        &[
            Self::HerbBoxes,
            Self::Staves,
            Self::Essence,
            Self::Runes,
            Self::Sand,
            Self::Flax,
            Self::Bonemeal,
            Self::Dynamite,
        ]
    }
}

/// Per-task configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Informational reminder emitted when a task can be collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub task_id: TaskId,
    pub message: String,
}

/// Notification-sink capability handed to the engine at construction.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Sink that writes reminders to the log at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&mut self, notification: Notification) {
        log::info!("{}", notification.message);
    }
}
