//! Character sheets.
//!
//! Holds the persisted character record plus the read-side values derived
//! from it (hit points, armor class, modifiers). Derived values are never
//! stored; [`CharacterSheet`] recomputes them on every read.

use crate::class_data::{ArmorRule, DexContribution, MAX_CREATION_STAT_TOTAL};
use crate::error::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// ID Types
// ============================================================================

/// Unique identifier for characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CharacterId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CharacterId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

// ============================================================================
// Ability Scores
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    /// Lowercase key, as used on the wire and in history entries.
    pub fn key(&self) -> &'static str {
        match self {
            Ability::Strength => "strength",
            Ability::Dexterity => "dexterity",
            Ability::Constitution => "constitution",
            Ability::Intelligence => "intelligence",
            Ability::Wisdom => "wisdom",
            Ability::Charisma => "charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Ability scores container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub const MIN_SCORE: u8 = 3;
    pub const MAX_SCORE: u8 = 20;

    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn standard_array() -> Self {
        Self::new(15, 14, 13, 12, 10, 8)
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i8 {
        ability_modifier(self.get(ability))
    }

    pub fn total(&self) -> u32 {
        Ability::all().iter().map(|a| u32::from(self.get(*a))).sum()
    }

    /// Range check on each score, then the creation budget on the sum.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for ability in Ability::all() {
            let value = self.get(ability);
            if !(Self::MIN_SCORE..=Self::MAX_SCORE).contains(&value) {
                return Err(ValidationError::StatOutOfRange { ability, value });
            }
        }

        let total = self.total();
        if total > MAX_CREATION_STAT_TOTAL {
            return Err(ValidationError::StatTotal {
                total,
                max: MAX_CREATION_STAT_TOTAL,
            });
        }
        Ok(())
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

/// `floor((score - 10) / 2)`: 8-9 is -1, 10-11 is 0, 12-13 is +1.
pub fn ability_modifier(score: u8) -> i8 {
    (i16::from(score) - 10).div_euclid(2) as i8
}

/// `2 + floor((level - 1) / 4)`.
pub fn proficiency_bonus(level: u8) -> i8 {
    2 + (level.saturating_sub(1) / 4) as i8
}

// ============================================================================
// Races and Classes
// ============================================================================

/// Playable races.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RaceType {
    Human,
    Elf,
    Dwarf,
    Halfling,
    Dragonborn,
    Gnome,
    #[serde(rename = "Half-Elf")]
    HalfElf,
    #[serde(rename = "Half-Orc")]
    HalfOrc,
    Tiefling,
}

impl RaceType {
    pub fn name(&self) -> &'static str {
        match self {
            RaceType::Human => "Human",
            RaceType::Elf => "Elf",
            RaceType::Dwarf => "Dwarf",
            RaceType::Halfling => "Halfling",
            RaceType::Dragonborn => "Dragonborn",
            RaceType::Gnome => "Gnome",
            RaceType::HalfElf => "Half-Elf",
            RaceType::HalfOrc => "Half-Orc",
            RaceType::Tiefling => "Tiefling",
        }
    }
}

impl fmt::Display for RaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Fighter,
    Wizard,
    Rogue,
    Cleric,
    Ranger,
    Paladin,
    Barbarian,
    Bard,
    Druid,
    Monk,
    Warlock,
}

impl CharacterClass {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Fighter => "Fighter",
            CharacterClass::Wizard => "Wizard",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Paladin => "Paladin",
            CharacterClass::Barbarian => "Barbarian",
            CharacterClass::Bard => "Bard",
            CharacterClass::Druid => "Druid",
            CharacterClass::Monk => "Monk",
            CharacterClass::Warlock => "Warlock",
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Equipment
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmorType {
    None,
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    #[serde(rename = "type")]
    pub kind: ArmorType,
    pub name: String,
}

impl Armor {
    pub fn new(kind: ArmorType, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub description: String,
}

fn default_quantity() -> u32 {
    1
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, quantity: u32, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            description: description.into(),
        }
    }
}

// ============================================================================
// Derived statistics
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub maximum: i32,
}

/// Maximum HP is the class hit die plus the constitution modifier; a fresh
/// character starts at full.
pub fn hit_points(class: CharacterClass, constitution: u8) -> HitPoints {
    let maximum = class.hit_die() + i32::from(ability_modifier(constitution));
    HitPoints {
        current: maximum,
        maximum,
    }
}

/// Armor class is a pure function of armor type and dexterity.
pub fn armor_class(armor: ArmorType, dexterity: u8) -> i32 {
    let ArmorRule { base, dexterity: dex_rule } = armor.rule();
    let dex_mod = ability_modifier(dexterity);
    let bonus = match dex_rule {
        DexContribution::Full => dex_mod,
        DexContribution::Capped(cap) => dex_mod.min(cap),
        DexContribution::Ignored => 0,
    };
    base + i32::from(bonus)
}

// ============================================================================
// Character
// ============================================================================

/// A persisted player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub race: RaceType,
    pub class: CharacterClass,
    pub level: u8,
    pub stats: AbilityScores,
    pub armor: Armor,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when creating a character.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCharacter {
    pub name: String,
    pub race: RaceType,
    pub class: CharacterClass,
    #[serde(default = "default_level")]
    pub level: u8,
    pub stats: AbilityScores,
    pub armor: Armor,
    #[serde(default)]
    pub inventory: Vec<InventoryItem>,
}

fn default_level() -> u8 {
    1
}

/// A full or partial update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPatch {
    pub name: Option<String>,
    pub race: Option<RaceType>,
    pub class: Option<CharacterClass>,
    pub level: Option<u8>,
    pub stats: Option<AbilityScores>,
    pub armor: Option<Armor>,
    pub inventory: Option<Vec<InventoryItem>>,
}

impl Character {
    /// Build and validate a new character with a fresh id.
    pub fn create(new: NewCharacter) -> Result<Self, ValidationError> {
        let character = Self {
            id: CharacterId::new(),
            name: new.name.trim().to_string(),
            race: new.race,
            class: new.class,
            level: new.level,
            stats: new.stats,
            armor: new.armor,
            inventory: new.inventory,
            created_at: Utc::now(),
        };
        character.validate()?;
        Ok(character)
    }

    /// Merge a patch into a copy of this character and validate the result.
    ///
    /// The id and creation time never change.
    pub fn apply(&self, patch: CharacterPatch) -> Result<Self, ValidationError> {
        let mut updated = self.clone();
        if let Some(name) = patch.name {
            updated.name = name.trim().to_string();
        }
        if let Some(race) = patch.race {
            updated.race = race;
        }
        if let Some(class) = patch.class {
            updated.class = class;
        }
        if let Some(level) = patch.level {
            updated.level = level;
        }
        if let Some(stats) = patch.stats {
            updated.stats = stats;
        }
        if let Some(armor) = patch.armor {
            updated.armor = armor;
        }
        if let Some(inventory) = patch.inventory {
            updated.inventory = inventory;
        }
        updated.validate()?;
        Ok(updated)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.armor.name.trim().is_empty() {
            return Err(ValidationError::MissingField("armor.name"));
        }
        if !(1..=20).contains(&self.level) {
            return Err(ValidationError::LevelOutOfRange(self.level));
        }
        self.stats.validate()
    }

    pub fn ability_modifier(&self, ability: Ability) -> i8 {
        self.stats.modifier(ability)
    }

    pub fn proficiency_bonus(&self) -> i8 {
        proficiency_bonus(self.level)
    }

    pub fn hit_points(&self) -> HitPoints {
        hit_points(self.class, self.stats.constitution)
    }

    pub fn armor_class(&self) -> i32 {
        armor_class(self.armor.kind, self.stats.dexterity)
    }

    /// The character together with its derived statistics.
    pub fn sheet(&self) -> CharacterSheet {
        CharacterSheet::from(self.clone())
    }
}

/// Modifier for each ability, keyed like [`AbilityScores`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityModifiers {
    pub strength: i8,
    pub dexterity: i8,
    pub constitution: i8,
    pub intelligence: i8,
    pub wisdom: i8,
    pub charisma: i8,
}

impl From<&AbilityScores> for AbilityModifiers {
    fn from(stats: &AbilityScores) -> Self {
        Self {
            strength: stats.modifier(Ability::Strength),
            dexterity: stats.modifier(Ability::Dexterity),
            constitution: stats.modifier(Ability::Constitution),
            intelligence: stats.modifier(Ability::Intelligence),
            wisdom: stats.modifier(Ability::Wisdom),
            charisma: stats.modifier(Ability::Charisma),
        }
    }
}

/// Read model: a character with its derived statistics attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSheet {
    #[serde(flatten)]
    pub character: Character,
    pub hit_points: HitPoints,
    pub armor_class: i32,
    pub proficiency_bonus: i8,
    pub ability_modifiers: AbilityModifiers,
}

impl From<Character> for CharacterSheet {
    fn from(character: Character) -> Self {
        Self {
            hit_points: character.hit_points(),
            armor_class: character.armor_class(),
            proficiency_bonus: character.proficiency_bonus(),
            ability_modifiers: AbilityModifiers::from(&character.stats),
            character,
        }
    }
}
