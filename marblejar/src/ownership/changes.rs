//! Diffing two ownership snapshots (owner -> marble count).

use std::collections::BTreeMap;

pub type OwnershipCounts = BTreeMap<String, u32>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipChanges {
    /// Marbles gained per owner present in the current snapshot. Losses
    /// count as zero.
    pub added: BTreeMap<String, u32>,
    /// True when the current user is among the owners that gained marbles.
    pub user_got_marble: bool,
}

impl OwnershipChanges {
    pub fn added_for(&self, owner: &str) -> u32 {
        self.added.get(owner).copied().unwrap_or(0)
    }
}

/// Compare `current` against `previous`. Owners missing from `previous`
/// start from zero.
pub fn detect_changes(
    previous: &OwnershipCounts,
    current: &OwnershipCounts,
    current_user: Option<&str>,
) -> OwnershipChanges {
    let mut changes = OwnershipChanges::default();

    for (owner, &count) in current {
        let before = previous.get(owner).copied().unwrap_or(0);
        let added = count.saturating_sub(before);
        changes.added.insert(owner.clone(), added);

        if added > 0 && current_user == Some(owner.as_str()) {
            changes.user_got_marble = true;
        }
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u32)]) -> OwnershipCounts {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn new_owner_counts_from_zero() {
        let changes = detect_changes(&counts(&[]), &counts(&[("alice", 3)]), None);
        assert_eq!(changes.added_for("alice"), 3);
        assert!(!changes.user_got_marble);
    }

    #[test]
    fn losses_clamp_to_zero() {
        let changes = detect_changes(&counts(&[("bob", 5)]), &counts(&[("bob", 2)]), Some("bob"));
        assert_eq!(changes.added_for("bob"), 0);
        assert!(!changes.user_got_marble);
    }

    #[test]
    fn flags_current_user_gain() {
        let prev = counts(&[("alice", 1), ("bob", 1)]);
        let cur = counts(&[("alice", 2), ("bob", 1)]);

        assert!(detect_changes(&prev, &cur, Some("alice")).user_got_marble);
        assert!(!detect_changes(&prev, &cur, Some("bob")).user_got_marble);
    }
}
