//! Ability-check classification for free-text player actions.
//!
//! Maps what the player typed onto an ability, a difficulty class and the
//! character's modifier. Nothing is rolled here: the result only feeds the
//! narration prompt and the session history.

use crate::character::{Ability, AbilityScores};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DC_DEFAULT: u8 = 10;
pub const DC_HARD: u8 = 15;
pub const DC_NEARLY_IMPOSSIBLE: u8 = 20;

/// Phrases that push the DC to [`DC_HARD`].
pub const HARD_KEYWORDS: &[&str] = &["very", "extremely"];

/// Phrases that push the DC to [`DC_NEARLY_IMPOSSIBLE`]. Checked before
/// [`HARD_KEYWORDS`].
pub const NEARLY_IMPOSSIBLE_KEYWORDS: &[&str] = &["nearly impossible", "impossible"];

/// Trigger substrings per ability, in the order abilities are tried.
pub const ABILITY_TRIGGERS: [(Ability, &[&str]); 6] = [
    (
        Ability::Strength,
        &[
            "lift", "push", "pull", "break", "force", "carry", "climb", "jump", "wrestle",
            "grapple", "throw", "drag",
        ],
    ),
    (
        Ability::Dexterity,
        &[
            "dodge",
            "sneak",
            "hide",
            "steal",
            "lockpick",
            "disarm",
            "acrobatics",
            "balance",
            "move silently",
            "pick pocket",
            "tumble",
            "escape",
        ],
    ),
    (
        Ability::Constitution,
        &[
            "endure",
            "resist",
            "withstand",
            "survive",
            "hold breath",
            "resist poison",
            "resist disease",
            "resist exhaustion",
        ],
    ),
    (
        Ability::Intelligence,
        &[
            "investigate",
            "research",
            "analyze",
            "study",
            "recall",
            "remember",
            "decipher",
            "solve",
            "figure out",
            "understand",
        ],
    ),
    (
        Ability::Wisdom,
        &[
            "perceive", "notice", "sense", "track", "survival", "insight", "meditate", "observe",
            "spot", "listen",
        ],
    ),
    (
        Ability::Charisma,
        &[
            "persuade",
            "deceive",
            "intimidate",
            "perform",
            "bargain",
            "negotiate",
            "convince",
            "lie",
            "bluff",
            "charm",
            "seduce",
        ],
    ),
];

/// A check the narrator should take into account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityCheck {
    pub ability: Ability,
    pub dc: u8,
    pub modifier: i8,
}

impl fmt::Display for AbilityCheck {
    /// History form: `strength check (DC 15) modifier 2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} check (DC {}) modifier {}",
            self.ability.key(),
            self.dc,
            self.modifier
        )
    }
}

/// Classify an action.
///
/// The first ability (in [`ABILITY_TRIGGERS`] order) with any trigger
/// contained in the lowercased text wins. `None` means no check is needed,
/// which is an ordinary outcome.
pub fn classify(action: &str, stats: &AbilityScores) -> Option<AbilityCheck> {
    let text = action.to_lowercase();

    let ability = ABILITY_TRIGGERS
        .iter()
        .find(|(_, triggers)| triggers.iter().any(|t| text.contains(t)))
        .map(|(ability, _)| *ability)?;

    Some(AbilityCheck {
        ability,
        dc: difficulty_class(&text),
        modifier: stats.modifier(ability),
    })
}

/// Difficulty implied by the wording of an action. Expects lowercase text.
pub fn difficulty_class(text: &str) -> u8 {
    if NEARLY_IMPOSSIBLE_KEYWORDS.iter().any(|k| text.contains(k)) {
        DC_NEARLY_IMPOSSIBLE
    } else if HARD_KEYWORDS.iter().any(|k| text.contains(k)) {
        DC_HARD
    } else {
        DC_DEFAULT
    }
}
