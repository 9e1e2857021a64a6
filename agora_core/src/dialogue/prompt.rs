//! Prompt text for the dialogue protocol.

use crate::PersonaProfile;

/// Fixed instruction for the summarization call.
pub const SUMMARY_PROMPT: &str = "Write a markdown summary of the conversation in the following format:

# Dialogue Summary

## Key Arguments
- The core claims each persona put forward

## Commonalities and Differences
- A comparison of the two personas' perspectives

## Key Advice
- The main pieces of advice that would help the user

## Conclusion
A short conclusion synthesizing the advice for the user's concern";

/// Seed system message embedding both profiles and the user's concern.
pub fn system_prompt(
    persona_a: &PersonaProfile,
    persona_b: &PersonaProfile,
    user_concern: &str,
    final_recommendation: bool,
) -> String {
    let mut prompt = format!(
        "You are generating a conversation between two historical figures.

First persona:
{first}

Second persona:
{second}

User's concern: {user_concern}

Follow these guidelines when generating the dialogue:
1. Each persona advises on the user's concern from their own experience and perspective.
2. The conversation flows naturally and reflects each persona's era and values.
3. Each persona's tone reflects their personality traits and manner of speech.
4. Advice is connected to the persona's historical context and personal experience.
5. The personas engage constructively, debating and building on each other's views.",
        first = persona_a.prompt_context(),
        second = persona_b.prompt_context(),
    );

    if final_recommendation {
        prompt.push_str(
            "\n6. The conversation ends with a final recommendation that synthesizes both perspectives for the user.",
        );
    }

    prompt
}

/// Per-turn user message naming the speaker, the counterpart and progress.
///
/// `turn` is zero-based; `total_turns` is always even, so the last turn
/// belongs to the second persona.
pub fn turn_prompt(
    current: &PersonaProfile,
    counterpart: &PersonaProfile,
    turn: usize,
    total_turns: usize,
    final_recommendation: bool,
) -> String {
    let speaker = &current.name;
    let other = &counterpart.name;

    let mut prompt = format!(
        "The current speaker is {speaker}.
The counterpart is {other}.

Considering the conversation so far, continue the dialogue from {speaker}'s perspective.
Speak only as {speaker}: do not write lines for {other} and do not prefix the reply with a speaker label.
Reflect {speaker}'s historical background, experience and personality.
This is turn {current_turn}/{total_turns}. The closer the conversation gets to the final turn, the more naturally it should move toward a close.",
        current_turn = turn + 1,
    );

    let last = total_turns.saturating_sub(1);
    if turn == last {
        prompt.push_str("\n\nThis is the closing turn. Conclude the conversation");
        if final_recommendation {
            prompt.push_str(
                " with a final synthesized recommendation for the user that draws on both perspectives.",
            );
        } else {
            prompt.push_str(" and leave the user with a clear final message.");
        }
    } else if turn + 1 == last {
        prompt.push_str(&format!(
            "\n\nThis is {speaker}'s last turn. Begin drawing your points together so that {other} can close the conversation."
        ));
    }

    prompt
}

/// User-role content for the summarization call.
pub fn summary_input(user_concern: &str, formatted_transcript: &str) -> String {
    format!("User's concern: {user_concern}\n\n{formatted_transcript}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (PersonaProfile, PersonaProfile) {
        (PersonaProfile::named("A"), PersonaProfile::named("B"))
    }

    #[test]
    fn test_system_prompt_embeds_profiles_and_concern() {
        let (a, b) = pair();
        let prompt = system_prompt(&a, &b, "How do I handle stress?", false);

        assert!(prompt.contains(&a.prompt_context()));
        assert!(prompt.contains(&b.prompt_context()));
        assert!(prompt.contains("User's concern: How do I handle stress?"));
        assert!(prompt.contains("5. The personas engage constructively"));
        assert!(!prompt.contains("6. "));
    }

    #[test]
    fn test_system_prompt_final_recommendation_variant() {
        let (a, b) = pair();
        let prompt = system_prompt(&a, &b, "concern", true);
        assert!(prompt.contains("6. The conversation ends with a final recommendation"));
    }

    #[test]
    fn test_turn_prompt_names_speakers_and_progress() {
        let (a, b) = pair();
        let prompt = turn_prompt(&a, &b, 0, 6, true);

        assert!(prompt.starts_with("The current speaker is A.\nThe counterpart is B."));
        assert!(prompt.contains("Speak only as A"));
        assert!(prompt.contains("This is turn 1/6."));
        assert!(!prompt.contains("closing turn"));
        assert!(!prompt.contains("last turn"));
    }

    #[test]
    fn test_final_round_prompts() {
        let (a, b) = pair();

        let penultimate = turn_prompt(&a, &b, 4, 6, true);
        assert!(penultimate.contains("This is turn 5/6."));
        assert!(penultimate.contains("This is A's last turn"));
        assert!(penultimate.contains("B can close the conversation"));

        let closing = turn_prompt(&b, &a, 5, 6, true);
        assert!(closing.contains("This is turn 6/6."));
        assert!(closing.contains("This is the closing turn"));
        assert!(closing.contains("final synthesized recommendation"));

        let plain_closing = turn_prompt(&b, &a, 5, 6, false);
        assert!(plain_closing.contains("clear final message"));
    }

    #[test]
    fn test_summary_prompt_has_four_sections() {
        for header in [
            "## Key Arguments",
            "## Commonalities and Differences",
            "## Key Advice",
            "## Conclusion",
        ] {
            assert!(SUMMARY_PROMPT.contains(header), "missing {header}");
        }
    }
}
