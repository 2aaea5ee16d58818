//! # Collection
//!
//! The player's saved swords. Entries are snapshots: saving never edits an
//! existing entry, and the only way out is removal.
//!
//! A snapshot is keyed by sword id plus progress (tier, enhancement count),
//! so a sword saved again after it moves forward gets a second entry, while
//! saving the same state twice stores it once. Removal drops every snapshot
//! of an id.

use std::collections::BTreeMap;

use herosword_shared::SwordId;

use crate::sword::Sword;

/// Identity of one saved snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotKey {
    /// The sword the snapshot was taken of.
    pub id: SwordId,
    /// Its tier at save time.
    pub tier: u32,
    /// Its enhancement count at save time.
    pub enhancement_count: u32,
}

impl SnapshotKey {
    /// Key of `sword` as it is now.
    #[must_use]
    pub const fn of(sword: &Sword) -> Self {
        Self {
            id: sword.id(),
            tier: sword.tier(),
            enhancement_count: sword.enhancement_count(),
        }
    }

    const fn lowest(id: SwordId) -> Self {
        Self {
            id,
            tier: 0,
            enhancement_count: 0,
        }
    }

    const fn highest(id: SwordId) -> Self {
        Self {
            id,
            tier: u32::MAX,
            enhancement_count: u32::MAX,
        }
    }
}

/// A set of saved sword snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collection {
    swords: BTreeMap<SnapshotKey, Sword>,
}

impl Collection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection with a snapshot of `sword` added.
    ///
    /// A snapshot at the same id, tier and enhancement count is not
    /// overwritten.
    #[must_use]
    pub fn with_saved(&self, sword: Sword) -> Self {
        let mut swords = self.swords.clone();
        swords.entry(SnapshotKey::of(&sword)).or_insert(sword);
        Self { swords }
    }

    /// Collection without any snapshot of `id`. Removing an absent id is a
    /// no-op.
    #[must_use]
    pub fn without(&self, id: SwordId) -> Self {
        let mut swords = self.swords.clone();
        swords.retain(|key, _| key.id != id);
        Self { swords }
    }

    /// Returns true if any snapshot of `id` is saved.
    #[must_use]
    pub fn contains(&self, id: SwordId) -> bool {
        self.snapshots(id).next().is_some()
    }

    /// Returns true if `sword` in its current state is saved.
    #[inline]
    #[must_use]
    pub fn contains_snapshot(&self, sword: &Sword) -> bool {
        self.swords.contains_key(&SnapshotKey::of(sword))
    }

    /// Snapshots of `id`, oldest progress first.
    pub fn snapshots(&self, id: SwordId) -> impl DoubleEndedIterator<Item = &Sword> {
        self.swords
            .range(SnapshotKey::lowest(id)..=SnapshotKey::highest(id))
            .map(|(_, sword)| sword)
    }

    /// Most advanced snapshot of `id`.
    #[must_use]
    pub fn latest(&self, id: SwordId) -> Option<&Sword> {
        self.snapshots(id).next_back()
    }

    /// Number of saved snapshots.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.swords.len()
    }

    /// Returns true if nothing is saved.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.swords.is_empty()
    }

    /// Saved snapshots in id, then progress, order.
    pub fn iter(&self) -> impl Iterator<Item = &Sword> {
        self.swords.values()
    }

    /// Distinct saved ids in order.
    pub fn ids(&self) -> impl Iterator<Item = SwordId> + '_ {
        let mut last = None;
        self.swords.keys().filter_map(move |key| {
            if last == Some(key.id) {
                return None;
            }
            last = Some(key.id);
            last
        })
    }
}

impl FromIterator<Sword> for Collection {
    fn from_iter<I: IntoIterator<Item = Sword>>(iter: I) -> Self {
        let mut swords = BTreeMap::new();
        for sword in iter {
            swords.entry(SnapshotKey::of(&sword)).or_insert(sword);
        }
        Self { swords }
    }
}
