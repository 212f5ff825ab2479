use crate::domain::Task;
use serde::{Deserialize, Serialize};

/// XP needed to advance one level.
pub const XP_PER_LEVEL: u64 = 10;

/// Outcome of an award attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardOutcome {
    /// One XP was granted and recorded on the task.
    Granted,
    /// The task already contributed XP; nothing changed.
    AlreadyGranted,
}

/// Outcome of a revoke attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeOutcome {
    /// One XP was taken back and the task marked unawarded.
    Revoked,
    /// The task never contributed XP; nothing changed.
    NotAwarded,
}

/// XP and level accounting, persisted as the `stats` blob.
///
/// `level` is always derived as `xp / XP_PER_LEVEL`; it is recomputed
/// after every change and normalized on load, so a stale persisted
/// value can never survive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardLedger {
    #[serde(default)]
    pub xp: u64,
    #[serde(default)]
    pub level: u64,
}

impl RewardLedger {
    fn recompute_level(&mut self) {
        self.level = self.xp / XP_PER_LEVEL;
    }

    /// Normalize a ledger loaded from disk.
    pub fn normalized(mut self) -> Self {
        self.recompute_level();
        self
    }

    /// Grant one XP for completing `task`, at most once per task.
    pub fn award(&mut self, task: &mut Task) -> AwardOutcome {
        if task.xp_awarded {
            return AwardOutcome::AlreadyGranted;
        }
        self.xp += 1;
        self.recompute_level();
        task.xp_awarded = true;
        AwardOutcome::Granted
    }

    /// Take back the XP previously granted for `task`, if any. XP is
    /// floored at zero.
    pub fn revoke(&mut self, task: &mut Task) -> RevokeOutcome {
        if !task.xp_awarded {
            return RevokeOutcome::NotAwarded;
        }
        self.xp = self.xp.saturating_sub(1);
        self.recompute_level();
        task.xp_awarded = false;
        RevokeOutcome::Revoked
    }

    /// XP total required to reach the next level.
    pub fn next_level_threshold(&self) -> u64 {
        (self.level + 1) * XP_PER_LEVEL
    }

    /// XP still missing to the next level, floored at zero.
    pub fn xp_to_next_level(&self) -> u64 {
        self.next_level_threshold().saturating_sub(self.xp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_award_is_idempotent() {
        let mut ledger = RewardLedger::default();
        let mut task = Task::new("Test").unwrap();

        assert_eq!(ledger.award(&mut task), AwardOutcome::Granted);
        assert_eq!(ledger.xp, 1);

        assert_eq!(ledger.award(&mut task), AwardOutcome::AlreadyGranted);
        assert_eq!(ledger.xp, 1);
    }

    #[test]
    fn test_revoke_floors_at_zero() {
        let mut ledger = RewardLedger::default();
        let mut task = Task::new("Test").unwrap();

        assert_eq!(ledger.revoke(&mut task), RevokeOutcome::NotAwarded);
        assert_eq!(ledger.xp, 0);

        // A task marked awarded against an empty ledger must not underflow.
        task.xp_awarded = true;
        assert_eq!(ledger.revoke(&mut task), RevokeOutcome::Revoked);
        assert_eq!(ledger.xp, 0);
        assert!(!task.xp_awarded);
    }

    #[test]
    fn test_level_is_derived_after_every_operation() {
        let mut ledger = RewardLedger::default();
        for i in 0..25 {
            let mut task = Task::new(&format!("Task {i}")).unwrap();
            ledger.award(&mut task);
            assert_eq!(ledger.level, ledger.xp / XP_PER_LEVEL);
        }
        assert_eq!(ledger.xp, 25);
        assert_eq!(ledger.level, 2);

        let mut task = Task::new("Undo").unwrap();
        task.xp_awarded = true;
        ledger.revoke(&mut task);
        assert_eq!(ledger.xp, 24);
        assert_eq!(ledger.level, 2);
    }

    #[test]
    fn test_normalized_fixes_stale_level() {
        let ledger = RewardLedger { xp: 25, level: 99 }.normalized();
        assert_eq!(ledger.level, 2);
    }

    #[test]
    fn test_next_level_threshold() {
        let ledger = RewardLedger { xp: 25, level: 2 };
        assert_eq!(ledger.next_level_threshold(), 30);
        assert_eq!(ledger.xp_to_next_level(), 5);

        let fresh = RewardLedger::default();
        assert_eq!(fresh.next_level_threshold(), 10);
        assert_eq!(fresh.xp_to_next_level(), 10);
    }
}
