//! One-time tutorial hints.
//!
//! Each hint fires the first time the player reaches its screen or action
//! and never again. The log is just the set of hints already shown; it
//! persists under its own store key so a returning player is not
//! re-taught.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Every tutorial hint in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TutorialId {
    WorkshopIntro,
    WorkshopColor,
    WorkshopPattern,
    WorkshopDraw,
    StoreIntro,
    StoreSelect,
    StoreSell,
    UpgradesIntro,
    HomeNavigation,
}

impl TutorialId {
    pub const ALL: [TutorialId; 9] = [
        TutorialId::WorkshopIntro,
        TutorialId::WorkshopColor,
        TutorialId::WorkshopPattern,
        TutorialId::WorkshopDraw,
        TutorialId::StoreIntro,
        TutorialId::StoreSelect,
        TutorialId::StoreSell,
        TutorialId::UpgradesIntro,
        TutorialId::HomeNavigation,
    ];
}

/// Which tutorial hints have already been shown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutorialLog {
    completed: HashSet<TutorialId>,
}

impl TutorialLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a hint as shown. Completing twice is harmless.
    pub fn complete(&mut self, id: TutorialId) {
        self.completed.insert(id);
    }

    pub fn has_completed(&self, id: TutorialId) -> bool {
        self.completed.contains(&id)
    }

    /// True until the hint has been completed once.
    pub fn should_show(&self, id: TutorialId) -> bool {
        !self.has_completed(id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    /// Forgets every hint, for a fresh profile.
    pub fn reset(&mut self) {
        self.completed.clear();
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hints_show_until_completed() {
        let mut log = TutorialLog::new();
        assert!(log.should_show(TutorialId::WorkshopIntro));
        assert!(!log.has_completed(TutorialId::WorkshopIntro));

        log.complete(TutorialId::WorkshopIntro);
        assert!(!log.should_show(TutorialId::WorkshopIntro));
        assert!(log.has_completed(TutorialId::WorkshopIntro));

        // Other hints are untouched.
        assert!(log.should_show(TutorialId::StoreIntro));
    }

    #[test]
    fn completing_twice_counts_once() {
        let mut log = TutorialLog::new();
        log.complete(TutorialId::StoreSell);
        log.complete(TutorialId::StoreSell);
        assert_eq!(log.completed_count(), 1);
    }

    #[test]
    fn reset_forgets_everything() {
        let mut log = TutorialLog::new();
        for id in TutorialId::ALL {
            log.complete(id);
        }
        assert_eq!(log.completed_count(), TutorialId::ALL.len());

        log.reset();
        assert_eq!(log.completed_count(), 0);
        assert!(log.should_show(TutorialId::HomeNavigation));
    }

    #[test]
    fn serde_round_trip_keeps_completions() {
        let mut log = TutorialLog::new();
        log.complete(TutorialId::WorkshopColor);
        log.complete(TutorialId::UpgradesIntro);

        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains("workshop-color"));
        assert!(json.contains("upgrades-intro"));

        let back: TutorialLog = serde_json::from_str(&json).unwrap();
        assert!(back.has_completed(TutorialId::WorkshopColor));
        assert!(back.has_completed(TutorialId::UpgradesIntro));
        assert!(back.should_show(TutorialId::WorkshopDraw));
    }
}
