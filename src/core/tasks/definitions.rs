//! Daily task definitions.
//!
//! Every task is a row in [`TASKS`]: a list of prerequisites plus a daily
//! allowance read from the host's counters. Evaluation is generic; adding a
//! task means adding a row, not a function.

use crate::core::vars::{AccountType, GameVar, VarReader};

use super::model::TaskId;

pub const HERB_BOX_MESSAGE: &str = "You have herb boxes waiting to be collected at NMZ.";
pub const HERB_BOX_MAX: i32 = 15;
pub const HERB_BOX_COST: i32 = 9500;
pub const STAVES_MESSAGE: &str = "You have battlestaves waiting to be collected from Zaff.";
pub const ESSENCE_MESSAGE: &str = "You have essence waiting to be collected from Wizard Cromperty.";
pub const RUNES_MESSAGE: &str = "You have random runes waiting to be collected from Lundail.";
pub const SAND_MESSAGE: &str = "You have sand waiting to be collected from Bert.";
pub const SAND_QUEST_COMPLETE: i32 = 160;
pub const FLAX_MESSAGE: &str =
    "You have bowstrings waiting to be converted from flax from the Flax keeper.";
pub const BONEMEAL_MESSAGE: &str = "You have bonemeal and slime waiting to be collected from Robin.";
pub const BONEMEAL_PER_DIARY: i32 = 13;
pub const DYNAMITE_MESSAGE: &str = "You have dynamite waiting to be collected from Thirus.";

/// A prerequisite that must hold before a task is considered at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Var must equal the value exactly (diary completion flags)
    VarEquals(GameVar, i32),
    /// Var must be at least the value (points, quest progress)
    VarAtLeast(GameVar, i32),
    /// Account must be of this class
    Account(AccountType),
}

impl Requirement {
    /// `None` when the underlying input is unavailable.
    pub fn check(&self, vars: &dyn VarReader) -> Option<bool> {
        match *self {
            Self::VarEquals(var, value) => Some(vars.var(var)? == value),
            Self::VarAtLeast(var, value) => Some(vars.var(var)? >= value),
            Self::Account(account_type) => Some(vars.account_type()? == account_type),
        }
    }
}

/// How much of a task can be collected per reset period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allowance {
    /// Collectible once; the counter reads 0 until collected
    Once(GameVar),
    /// Collectible while the counter is below a fixed maximum
    UpTo { collected: GameVar, max: i32 },
    /// Maximum grows by `per_tier` for the base tier and for every
    /// achieved extra tier
    Tiered {
        collected: GameVar,
        per_tier: i32,
        extra_tiers: &'static [GameVar],
    },
}

impl Allowance {
    /// Maximum collectible amount for the current prerequisites.
    pub fn max(&self, vars: &dyn VarReader) -> Option<i32> {
        match *self {
            Self::Once(_) => Some(1),
            Self::UpTo { max, .. } => Some(max),
            Self::Tiered {
                per_tier,
                extra_tiers,
                ..
            } => {
                let mut max = per_tier;
                for tier in extra_tiers {
                    if vars.var(*tier)? == 1 {
                        max += per_tier;
                    }
                }
                Some(max)
            }
        }
    }

    /// Whether some of the allowance is still uncollected this period.
    pub fn remaining(&self, vars: &dyn VarReader) -> Option<bool> {
        match *self {
            Self::Once(collected) => Some(vars.var(collected)? == 0),
            Self::UpTo { collected, .. } | Self::Tiered { collected, .. } => {
                let max = self.max(vars)?;
                Some(vars.var(collected)? < max)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TaskDefinition {
    pub id: TaskId,
    pub message: &'static str,
    pub requires: &'static [Requirement],
    pub allowance: Allowance,
}

impl TaskDefinition {
    /// Evaluate the task against the current counters.
    ///
    /// On a reset pass the host's "collected" counter may still hold the
    /// previous period's value, so a met prerequisite is enough.
    /// Returns `None` if any input the task needs is missing.
    pub fn is_collectible(&self, vars: &dyn VarReader, reset: bool) -> Option<bool> {
        for requirement in self.requires {
            if !requirement.check(vars)? {
                return Some(false);
            }
        }
        let remaining = self.allowance.remaining(vars)?;
        Some(remaining || reset)
    }
}

/// All daily tasks in evaluation order.
pub const TASKS: &[TaskDefinition] = &[
    TaskDefinition {
        id: TaskId::HerbBoxes,
        message: HERB_BOX_MESSAGE,
        requires: &[
            Requirement::Account(AccountType::Normal),
            Requirement::VarAtLeast(GameVar::NmzRewardPoints, HERB_BOX_COST),
        ],
        allowance: Allowance::UpTo {
            collected: GameVar::DailyHerbBoxesCollected,
            max: HERB_BOX_MAX,
        },
    },
    TaskDefinition {
        id: TaskId::Staves,
        message: STAVES_MESSAGE,
        requires: &[Requirement::VarEquals(GameVar::DiaryVarrockEasy, 1)],
        allowance: Allowance::Once(GameVar::DailyStavesCollected),
    },
    TaskDefinition {
        id: TaskId::Essence,
        message: ESSENCE_MESSAGE,
        requires: &[Requirement::VarEquals(GameVar::DiaryArdougneMedium, 1)],
        allowance: Allowance::Once(GameVar::DailyEssenceCollected),
    },
    TaskDefinition {
        id: TaskId::Runes,
        message: RUNES_MESSAGE,
        requires: &[Requirement::VarEquals(GameVar::DiaryWildernessEasy, 1)],
        allowance: Allowance::Once(GameVar::DailyRunesCollected),
    },
    TaskDefinition {
        id: TaskId::Sand,
        message: SAND_MESSAGE,
        requires: &[Requirement::VarAtLeast(
            GameVar::QuestTheHandInTheSand,
            SAND_QUEST_COMPLETE,
        )],
        allowance: Allowance::Once(GameVar::DailySandCollected),
    },
    TaskDefinition {
        id: TaskId::Flax,
        message: FLAX_MESSAGE,
        requires: &[Requirement::VarEquals(GameVar::DiaryKandarinEasy, 1)],
        allowance: Allowance::Once(GameVar::DailyFlaxState),
    },
    TaskDefinition {
        id: TaskId::Bonemeal,
        message: BONEMEAL_MESSAGE,
        requires: &[Requirement::VarEquals(GameVar::DiaryMorytaniaMedium, 1)],
        allowance: Allowance::Tiered {
            collected: GameVar::DailyBonemealState,
            per_tier: BONEMEAL_PER_DIARY,
            extra_tiers: &[GameVar::DiaryMorytaniaHard, GameVar::DiaryMorytaniaElite],
        },
    },
    TaskDefinition {
        id: TaskId::Dynamite,
        message: DYNAMITE_MESSAGE,
        requires: &[Requirement::VarEquals(GameVar::DiaryKourendMedium, 1)],
        allowance: Allowance::Once(GameVar::DailyDynamiteCollected),
    },
];

/// Look up the definition for a task.
pub fn find(id: TaskId) -> Option<&'static TaskDefinition> {
    TASKS.iter().find(|def| def.id == id)
}
