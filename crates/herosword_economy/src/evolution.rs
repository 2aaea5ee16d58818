//! # Evolution Table
//!
//! One ordered table from tier to the sword's name, artwork and type class.
//!
//! Lookups past the last entry saturate: every tier at or beyond the content
//! cap reuses the final entry. Tier 0 does not exist and reads as tier 1.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric type classification of a sword (the on-chain `sword_type`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeClass(pub u8);

impl TypeClass {
    /// Returns the element shown for this type class.
    ///
    /// Classes without a dedicated element display as [`Element::Normal`].
    #[must_use]
    pub const fn element(self) -> Element {
        match self.0 {
            1 => Element::Fire,
            2 => Element::Ice,
            3 => Element::Lightning,
            4 => Element::Dark,
            5 => Element::Holy,
            6 => Element::Legendary,
            7 => Element::Divine,
            _ => Element::Normal,
        }
    }
}

impl fmt::Display for TypeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Elemental affinity used for badges and card colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Element {
    /// Plain steel - gray
    Normal = 0,
    /// Red
    Fire = 1,
    /// Blue
    Ice = 2,
    /// Yellow
    Lightning = 3,
    /// Purple
    Dark = 4,
    /// Green
    Holy = 5,
    /// Orange
    Legendary = 6,
    /// Violet
    Divine = 7,
}

impl Element {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Fire => "Fire",
            Self::Ice => "Ice",
            Self::Lightning => "Lightning",
            Self::Dark => "Dark",
            Self::Holy => "Holy",
            Self::Legendary => "Legendary",
            Self::Divine => "Divine",
        }
    }
}

/// Everything the table says about one tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierInfo {
    /// Name shown to the player.
    pub display_name: &'static str,
    /// Artwork path served by the front end.
    pub artwork_ref: &'static str,
    /// Type classification.
    pub type_class: TypeClass,
}

const fn entry(display_name: &'static str, artwork_ref: &'static str, type_class: u8) -> TierInfo {
    TierInfo {
        display_name,
        artwork_ref,
        type_class: TypeClass(type_class),
    }
}

/// The evolution ladder, index 0 = tier 1 (the mint-time base item).
pub const EVOLUTION_TABLE: [TierInfo; 20] = [
    entry("a piece of iron", "/images/swords/1단계.png", 0),
    entry("knife", "/images/swords/2단계.png", 0),
    entry("short sword", "/images/swords/3단계.png", 0),
    entry("longsword", "/images/swords/4단계.png", 0),
    entry("steel blade", "/images/swords/5단계.png", 1),
    entry("greatsword", "/images/swords/6단계.png", 2),
    entry("claymore", "/images/swords/7단계.png", 3),
    entry("rune blade", "/images/swords/8단계.png", 4),
    entry("dragon fang", "/images/swords/9단계.png", 5),
    entry("sui sword", "/images/swords/10단계.png", 6),
    entry("mystic saber", "/images/swords/11단계.png", 7),
    entry("phantom edge", "/images/swords/12단계.png", 8),
    entry("celestial blade", "/images/swords/13단계.png", 9),
    entry("void cutter", "/images/swords/14단계.png", 10),
    entry("eternal scimitar", "/images/swords/15단계.png", 11),
    entry("chaos breaker", "/images/swords/16단계.png", 12),
    entry("spirit katana", "/images/swords/17단계.png", 13),
    entry("astral fang", "/images/swords/18단계.png", 14),
    entry("infinity edge", "/images/swords/19단계.png", 15),
    entry("Dragon Slayer Rift Vanquisher", "/images/swords/20단계.png", 16),
];

/// Highest tier with its own table entry.
pub const MAX_DEFINED_TIER: u32 = EVOLUTION_TABLE.len() as u32;

/// Looks up a tier, saturating at both ends.
#[inline]
#[must_use]
pub const fn tier_info(tier: u32) -> TierInfo {
    let clamped = if tier == 0 {
        1
    } else if tier > MAX_DEFINED_TIER {
        MAX_DEFINED_TIER
    } else {
        tier
    };
    EVOLUTION_TABLE[(clamped - 1) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_tier() {
        let info = tier_info(1);
        assert_eq!(info.display_name, "a piece of iron");
        assert_eq!(info.artwork_ref, "/images/swords/1단계.png");
        assert_eq!(info.type_class, TypeClass(0));
    }

    #[test]
    fn test_type_class_progression() {
        for tier in 1..=4 {
            assert_eq!(tier_info(tier).type_class, TypeClass(0));
        }
        for tier in 5..=MAX_DEFINED_TIER {
            assert_eq!(u32::from(tier_info(tier).type_class.0), tier - 4);
        }
    }

    #[test]
    fn test_saturates_past_cap() {
        let last = tier_info(MAX_DEFINED_TIER);
        assert_eq!(last.display_name, "Dragon Slayer Rift Vanquisher");
        assert_eq!(tier_info(21), last);
        assert_eq!(tier_info(500), last);
        assert_eq!(tier_info(u32::MAX), last);
    }

    #[test]
    fn test_tier_zero_reads_as_base() {
        assert_eq!(tier_info(0), tier_info(1));
    }

    #[test]
    fn test_every_tier_is_distinct() {
        for (i, a) in EVOLUTION_TABLE.iter().enumerate() {
            for b in &EVOLUTION_TABLE[i + 1..] {
                assert_ne!(a.display_name, b.display_name);
                assert_ne!(a.artwork_ref, b.artwork_ref);
            }
        }
    }

    #[test]
    fn test_element_fallback() {
        assert_eq!(TypeClass(1).element(), Element::Fire);
        assert_eq!(TypeClass(7).element().name(), "Divine");
        assert_eq!(TypeClass(16).element(), Element::Normal);
    }
}
