//! # Chain-Synced Owned Swords
//!
//! The player's `HeroSword` objects as last reported by the chain. The
//! engine re-fetches after every confirmed call and reads the transition
//! off the delta: which ids appeared, which vanished, which changed.

use std::collections::BTreeMap;

use herosword_shared::ObjectId;

use crate::contracts::HeroSword;

/// What changed between two snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncDelta {
    /// Ids owned now but not before, in chain order.
    pub added: Vec<ObjectId>,
    /// Ids owned before but not now.
    pub removed: Vec<ObjectId>,
    /// Ids owned in both snapshots whose fields differ.
    pub changed: Vec<ObjectId>,
}

impl SyncDelta {
    /// Returns true if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

/// Owned swords keyed by object id.
#[derive(Clone, Debug, Default)]
pub struct OwnedSwords {
    swords: BTreeMap<ObjectId, HeroSword>,
    /// Ids in the order the chain returned them.
    order: Vec<ObjectId>,
    syncs: u64,
}

impl OwnedSwords {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots applied.
    #[inline]
    #[must_use]
    pub const fn syncs(&self) -> u64 {
        self.syncs
    }

    /// Number of owned swords.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if nothing is owned.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Looks up an owned sword.
    #[inline]
    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&HeroSword> {
        self.swords.get(id)
    }

    /// First sword in chain order.
    #[must_use]
    pub fn first(&self) -> Option<&HeroSword> {
        self.order.first().and_then(|id| self.swords.get(id))
    }

    /// Owned swords in chain order.
    pub fn iter(&self) -> impl Iterator<Item = &HeroSword> {
        self.order.iter().filter_map(|id| self.swords.get(id))
    }

    /// Replaces the cache with a fresh snapshot and reports the delta.
    ///
    /// Duplicate ids in the snapshot keep their first occurrence.
    pub fn apply_snapshot(&mut self, snapshot: Vec<HeroSword>) -> SyncDelta {
        let mut next = BTreeMap::new();
        let mut order = Vec::with_capacity(snapshot.len());
        for sword in snapshot {
            if next.insert(sword.id, sword).is_none() {
                order.push(sword.id);
            }
        }

        let mut delta = SyncDelta::default();
        for id in &order {
            match self.swords.get(id) {
                None => delta.added.push(*id),
                Some(old) if next.get(id) != Some(old) => delta.changed.push(*id),
                Some(_) => {}
            }
        }
        delta.removed = self
            .order
            .iter()
            .filter(|id| !next.contains_key(*id))
            .copied()
            .collect();

        self.swords = next;
        self.order = order;
        self.syncs += 1;
        delta
    }

    /// Clears all state.
    pub fn clear(&mut self) {
        self.swords.clear();
        self.order.clear();
        self.syncs = 0;
    }
}
