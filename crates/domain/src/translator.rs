//! Voice-to-command translation by keyword containment.
//!
//! An utterance maps to a command when it contains both of the command's
//! keywords. The four checks are independent and evaluated in a fixed order
//! (light on, light off, door open, door close), so an utterance such as
//! "light on and off" yields two commands. [`MatchPolicy::FirstMatch`] is the
//! opt-in alternative that keeps only the first hit.

use serde::{Deserialize, Serialize};

use crate::command::Command;

/// Keyword pairs checked against an utterance, in evaluation order.
const RULES: [(Command, &str, &str); 4] = [
    (Command::LightOn, "light", "on"),
    (Command::LightOff, "light", "off"),
    (Command::DoorOpen, "door", "open"),
    (Command::DoorClose, "door", "close"),
];

/// How many commands a single utterance may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Every rule that matches contributes a command.
    #[default]
    #[serde(alias = "all")]
    AllMatches,
    /// Only the first matching rule contributes a command.
    #[serde(alias = "first")]
    FirstMatch,
}

/// Translate an utterance using the default [`MatchPolicy::AllMatches`].
#[must_use]
pub fn translate(utterance: &str) -> Vec<Command> {
    translate_with(utterance, MatchPolicy::AllMatches)
}

/// Translate an utterance under an explicit policy.
///
/// Matching is case-insensitive substring containment, so "on" also matches
/// inside words like "front".
#[must_use]
pub fn translate_with(utterance: &str, policy: MatchPolicy) -> Vec<Command> {
    let lowered = utterance.to_lowercase();
    let hits = RULES
        .iter()
        .filter(|(_, first, second)| lowered.contains(first) && lowered.contains(second))
        .map(|(cmd, _, _)| *cmd);

    match policy {
        MatchPolicy::AllMatches => hits.collect(),
        MatchPolicy::FirstMatch => hits.take(1).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_translate_door_open_sentence() {
        assert_eq!(translate("please open the door now"), vec![Command::DoorOpen]);
    }

    #[test]
    fn should_translate_light_on() {
        assert_eq!(translate("turn the light on"), vec![Command::LightOn]);
    }

    #[test]
    fn should_translate_light_off() {
        assert_eq!(translate("Light off please"), vec![Command::LightOff]);
    }

    #[test]
    fn should_translate_door_close() {
        assert_eq!(translate("close the door"), vec![Command::DoorClose]);
    }

    #[test]
    fn should_ignore_case() {
        assert_eq!(translate("OPEN THE DOOR"), vec![Command::DoorOpen]);
    }

    #[test]
    fn should_return_nothing_for_unrelated_utterance() {
        assert!(translate("what time is it").is_empty());
        assert!(translate("").is_empty());
    }

    #[test]
    fn should_require_both_keywords() {
        assert!(translate("open the window").is_empty());
        assert!(translate("the light is nice").is_empty());
    }

    #[test]
    fn should_emit_all_matches_in_fixed_order() {
        let commands = translate("door close, door open, light off, light on");
        assert_eq!(
            commands,
            vec![
                Command::LightOn,
                Command::LightOff,
                Command::DoorOpen,
                Command::DoorClose,
            ]
        );
    }

    #[test]
    fn should_keep_only_first_match_under_first_match_policy() {
        let commands = translate_with(
            "door close, door open, light off, light on",
            MatchPolicy::FirstMatch,
        );
        assert_eq!(commands, vec![Command::LightOn]);
    }

    #[test]
    fn should_produce_same_single_command_under_either_policy() {
        let utterance = "please open the door now";
        assert_eq!(
            translate_with(utterance, MatchPolicy::FirstMatch),
            translate_with(utterance, MatchPolicy::AllMatches)
        );
    }

    #[test]
    fn should_match_on_inside_other_words() {
        // "front" contains "on"; containment is not word-based.
        assert_eq!(
            translate("front light off"),
            vec![Command::LightOn, Command::LightOff]
        );
    }

    #[test]
    fn should_default_to_all_matches() {
        assert_eq!(MatchPolicy::default(), MatchPolicy::AllMatches);
    }

    #[test]
    fn should_deserialize_policy_aliases() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: MatchPolicy,
        }
        let all: Wrapper = toml::from_str("policy = 'all'").unwrap();
        let first: Wrapper = toml::from_str("policy = 'first_match'").unwrap();
        assert_eq!(all.policy, MatchPolicy::AllMatches);
        assert_eq!(first.policy, MatchPolicy::FirstMatch);
    }
}
