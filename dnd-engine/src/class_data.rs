//! Fixed rules tables for derived statistics.
//!
//! One canonical table each for hit dice and armor. Armor uses the
//! chain-mail flavoured table: heavy armor is a flat 16 with no dexterity.

use crate::character::{ArmorType, CharacterClass};

/// Upper bound on the sum of the six ability scores.
pub const MAX_CREATION_STAT_TOTAL: u32 = 75;

pub const UNARMORED_BASE_AC: i32 = 10;
pub const LIGHT_ARMOR_BASE_AC: i32 = 11;
pub const MEDIUM_ARMOR_BASE_AC: i32 = 14;
pub const HEAVY_ARMOR_BASE_AC: i32 = 16;
pub const MEDIUM_ARMOR_DEX_CAP: i8 = 2;

/// How much of the dexterity modifier an armor type lets through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DexContribution {
    Full,
    Capped(i8),
    Ignored,
}

/// Base AC plus dexterity rule for one armor type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmorRule {
    pub base: i32,
    pub dexterity: DexContribution,
}

impl ArmorType {
    pub const fn rule(self) -> ArmorRule {
        match self {
            ArmorType::None => ArmorRule {
                base: UNARMORED_BASE_AC,
                dexterity: DexContribution::Full,
            },
            ArmorType::Light => ArmorRule {
                base: LIGHT_ARMOR_BASE_AC,
                dexterity: DexContribution::Full,
            },
            ArmorType::Medium => ArmorRule {
                base: MEDIUM_ARMOR_BASE_AC,
                dexterity: DexContribution::Capped(MEDIUM_ARMOR_DEX_CAP),
            },
            ArmorType::Heavy => ArmorRule {
                base: HEAVY_ARMOR_BASE_AC,
                dexterity: DexContribution::Ignored,
            },
        }
    }
}

impl CharacterClass {
    /// Hit die size, which is also level 1 HP before the CON modifier.
    pub const fn hit_die(&self) -> i32 {
        match self {
            CharacterClass::Barbarian => 12,
            CharacterClass::Fighter | CharacterClass::Paladin | CharacterClass::Ranger => 10,
            CharacterClass::Rogue
            | CharacterClass::Cleric
            | CharacterClass::Bard
            | CharacterClass::Druid
            | CharacterClass::Monk
            | CharacterClass::Warlock => 8,
            CharacterClass::Wizard => 6,
        }
    }
}
