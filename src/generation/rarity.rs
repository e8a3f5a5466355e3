//! Weighted rarity draw for freshly generated cards

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Card rarity label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    /// Classify a roll in `[0, 100)`.
    ///
    /// Common 70%, Uncommon 15%, Rare 8%, Epic 6%, Legendary 1%.
    pub fn from_roll(roll: f64) -> Self {
        if roll < 70.0 {
            Rarity::Common
        } else if roll < 85.0 {
            Rarity::Uncommon
        } else if roll < 93.0 {
            Rarity::Rare
        } else if roll < 99.0 {
            Rarity::Epic
        } else {
            Rarity::Legendary
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draw a rarity from `rng`. Consumes exactly one uniform sample.
pub fn assign_rarity<R: Rng + ?Sized>(rng: &mut R) -> Rarity {
    Rarity::from_roll(rng.gen_range(0.0..100.0))
}
