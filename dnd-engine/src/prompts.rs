//! Prompt templates for the storyteller.
//!
//! Both builders are pure: the same inputs always give the same text.

use crate::character::Character;
use crate::checks::AbilityCheck;

/// System instruction sent with every completion.
pub const DM_SYSTEM_PROMPT: &str = "You are an experienced Dungeon Master running a D&D 5e game. Keep responses concise, engaging, and focused on storytelling.";

/// Prompt for the first scene of a session.
pub fn opening_prompt(character: &Character) -> String {
    format!(
        r#"You are a Dungeon Master for a D&D 5e game. The player's character is:
Name: {name}
Race: {race}
Class: {class}
Level: {level}

Create an engaging opening scene for this character. Include:
1. A brief description of the setting
2. A situation that requires the character's attention
3. 2-3 possible actions the character could take

Keep the response concise and engaging."#,
        name = character.name,
        race = character.race,
        class = character.class,
        level = character.level,
    )
}

/// Prompt that resolves a player action against the current scene.
pub fn action_prompt(
    character: &Character,
    current_scene: Option<&str>,
    action: &str,
    check: Option<&AbilityCheck>,
) -> String {
    let scene = current_scene.unwrap_or("The adventure has not yet begun.");
    let check_line = check
        .map(|c| {
            format!(
                "\nThis action calls for a {ability} check (DC {dc}). {name}'s {ability} modifier is {modifier:+}. Let the difficulty shape the outcome.\n",
                ability = c.ability,
                dc = c.dc,
                name = character.name,
                modifier = c.modifier,
            )
        })
        .unwrap_or_default();

    format!(
        r#"You are a Dungeon Master for a D&D 5e game. The current scene is:
{scene}

The player's character ({name}, {race} {class}) has chosen to:
{action}
{check_line}
Respond to this action by:
1. Describing the outcome of the action
2. Updating the scene
3. Presenting 2-3 new possible actions

Keep the response concise and engaging."#,
        name = character.name,
        race = character.race,
        class = character.class,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Ability;
    use crate::testing::sample_character;

    #[test]
    fn test_opening_prompt_embeds_identity() {
        let character = sample_character("Thorin");
        let prompt = opening_prompt(&character);

        assert!(prompt.contains("Name: Thorin"));
        assert!(prompt.contains("Race: Dwarf"));
        assert!(prompt.contains("Class: Fighter"));
        assert!(prompt.contains("Level: 1"));
        assert!(prompt.contains("2-3 possible actions"));
        assert!(prompt.contains("concise"));
    }

    #[test]
    fn test_opening_prompt_is_deterministic() {
        let character = sample_character("Thorin");
        assert_eq!(opening_prompt(&character), opening_prompt(&character));
    }

    #[test]
    fn test_action_prompt_without_check() {
        let character = sample_character("Thorin");
        let prompt = action_prompt(&character, Some("A dark cave."), "I sit quietly", None);

        assert!(prompt.contains("A dark cave."));
        assert!(prompt.contains("(Thorin, Dwarf Fighter)"));
        assert!(prompt.contains("I sit quietly"));
        assert!(!prompt.contains("check (DC"));
        assert!(prompt.contains("2-3 new possible actions"));
    }

    #[test]
    fn test_action_prompt_names_check() {
        let character = sample_character("Thorin");
        let check = AbilityCheck {
            ability: Ability::Strength,
            dc: 15,
            modifier: 2,
        };
        let prompt = action_prompt(
            &character,
            Some("A crumbling wall."),
            "I climb",
            Some(&check),
        );

        assert!(prompt.contains("Strength check (DC 15)"));
        assert!(prompt.contains("modifier is +2"));
    }

    #[test]
    fn test_action_prompt_without_scene() {
        let character = sample_character("Thorin");
        let prompt = action_prompt(&character, None, "I wait", None);
        assert!(prompt.contains("The adventure has not yet begun."));
        assert_eq!(prompt, action_prompt(&character, None, "I wait", None));
    }
}
