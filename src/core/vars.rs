//! Read access to the host's live game variables.
//!
//! The host owns every counter; this crate only ever reads a fresh value at
//! evaluation time. A missing value is reported as `None` and treated by the
//! task table as "not collectible".

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// External counters and flags consulted by the daily task table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameVar {
    /// 1 while the account has an active membership
    MembershipStatus,
    NmzRewardPoints,
    DailyHerbBoxesCollected,
    DiaryVarrockEasy,
    DailyStavesCollected,
    DiaryArdougneMedium,
    DailyEssenceCollected,
    DiaryWildernessEasy,
    DailyRunesCollected,
    /// Quest progress, 160 once complete
    QuestTheHandInTheSand,
    DailySandCollected,
    DiaryKandarinEasy,
    DailyFlaxState,
    DiaryMorytaniaMedium,
    DiaryMorytaniaHard,
    DiaryMorytaniaElite,
    DailyBonemealState,
    DiaryKourendMedium,
    DailyDynamiteCollected,
}

/// Account class as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Normal,
    Ironman,
    UltimateIronman,
    HardcoreIronman,
}

/// Counter-reader capability handed to the engine at construction.
pub trait VarReader {
    /// Current value of `var`, or `None` if the host cannot provide it.
    fn var(&self, var: GameVar) -> Option<i32>;

    /// Current account class, or `None` if not yet known.
    fn account_type(&self) -> Option<AccountType>;
}

impl<T: VarReader + ?Sized> VarReader for &T {
    fn var(&self, var: GameVar) -> Option<i32> {
        (**self).var(var)
    }

    fn account_type(&self) -> Option<AccountType> {
        (**self).account_type()
    }
}

/// In-memory snapshot of game variables.
///
/// Used by tests, the replay driver, and the live loop (which reloads it
/// from disk on every tick).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VarSnapshot {
    #[serde(default)]
    pub account_type: Option<AccountType>,
    #[serde(default)]
    pub vars: HashMap<GameVar, i32>,
}

impl VarSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, handy for fixtures.
    pub fn with(mut self, var: GameVar, value: i32) -> Self {
        self.vars.insert(var, value);
        self
    }

    pub fn with_account(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }

    pub fn set(&mut self, var: GameVar, value: i32) {
        self.vars.insert(var, value);
    }

    pub fn remove(&mut self, var: GameVar) -> Option<i32> {
        self.vars.remove(&var)
    }

    pub fn set_account_type(&mut self, account_type: Option<AccountType>) {
        self.account_type = account_type;
    }

    /// Load a snapshot written by the host as JSON.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(io::Error::from)
    }
}

impl VarReader for VarSnapshot {
    fn var(&self, var: GameVar) -> Option<i32> {
        self.vars.get(&var).copied()
    }

    fn account_type(&self) -> Option<AccountType> {
        self.account_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_var_is_none() {
        let snapshot = VarSnapshot::new().with(GameVar::DiaryVarrockEasy, 1);
        assert_eq!(snapshot.var(GameVar::DiaryVarrockEasy), Some(1));
        assert_eq!(snapshot.var(GameVar::DailyStavesCollected), None);
        assert_eq!(snapshot.account_type(), None);
    }

    #[test]
    fn test_load_snapshot_from_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"account_type": "hardcore_ironman", "vars": {{"membership_status": 1, "nmz_reward_points": 12000}}}}"#
        )
        .unwrap();

        let snapshot = VarSnapshot::load(file.path()).unwrap();
        assert_eq!(snapshot.account_type(), Some(AccountType::HardcoreIronman));
        assert_eq!(snapshot.var(GameVar::MembershipStatus), Some(1));
        assert_eq!(snapshot.var(GameVar::NmzRewardPoints), Some(12000));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(VarSnapshot::load(file.path()).is_err());
    }
}
