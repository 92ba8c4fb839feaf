//! Session flag set.
//!
//! Obstacle ids ("1-7"), spell unlocks ("sp1".."sp3") and story milestones
//! ("4-3", "end") all live here. Flags are only ever added.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Spell unlock for RETURN.
pub const RETURN_UNLOCKED: &str = "sp1";
/// Spell unlock for HEAL.
pub const HEAL_UNLOCKED: &str = "sp2";
/// Spell unlock for BURST.
pub const BURST_UNLOCKED: &str = "sp3";
/// Set once the treasure on the deepest floor has been won.
pub const TREASURE_WON: &str = "4-3";
/// Set once the ending has been shown.
pub const GAME_CLEARED: &str = "end";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlagSet(BTreeSet<String>);

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a flag, returning `true` if it was not already set.
    pub fn insert(&mut self, flag: impl Into<String>) -> bool {
        self.0.insert(flag.into())
    }

    pub fn contains(&self, flag: &str) -> bool {
        self.0.contains(flag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Between winning the treasure and reaching the town again.
    pub fn in_pre_ending(&self) -> bool {
        self.contains(TREASURE_WON) && !self.contains(GAME_CLEARED)
    }
}

impl<S: Into<String>> FromIterator<S> for FlagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_is_idempotent() {
        let mut flags = FlagSet::new();
        assert!(flags.insert("1-7"));
        assert!(!flags.insert("1-7"));
        assert_eq!(flags.len(), 1);
    }

    #[test]
    fn pre_ending_window() {
        let mut flags = FlagSet::new();
        assert!(!flags.in_pre_ending());
        flags.insert(TREASURE_WON);
        assert!(flags.in_pre_ending());
        flags.insert(GAME_CLEARED);
        assert!(!flags.in_pre_ending());
    }

    #[test]
    fn serializes_as_plain_array() {
        let flags: FlagSet = ["sp1", "0-6"].into_iter().collect();
        let json = serde_json::to_string(&flags).unwrap();
        assert_eq!(json, r#"["0-6","sp1"]"#);
        let back: FlagSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flags);
    }
}
