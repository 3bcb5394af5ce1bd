use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TipCategory {
    Science,
    Motivation,
    Hack,
    Quote,
    Trivia,
    Benefit,
}

/// One short health tip shown between exercises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WisdomTip {
    pub category: TipCategory,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WisdomDeck {
    pub tips: Vec<WisdomTip>,
    pub ai_available: bool,
}

const FALLBACK: [(TipCategory, &str); 8] = [
    (
        TipCategory::Science,
        "Sitting for 6+ hours drops leg blood flow by 50%.",
    ),
    (
        TipCategory::Motivation,
        "A 2-minute stretch resets your focus timer.",
    ),
    (
        TipCategory::Benefit,
        "Your Ergo Score protects long-term mobility.",
    ),
    (
        TipCategory::Quote,
        "Take rest; a field that has rested gives a bountiful crop.",
    ),
    (
        TipCategory::Trivia,
        "Blinking slows by 66% when looking at screens.",
    ),
    (
        TipCategory::Science,
        "Static posture is harder on the spine than movement.",
    ),
    (
        TipCategory::Hack,
        "Monitor at eye level reduces neck strain by 40%.",
    ),
    (TipCategory::Quote, "Motion is lotion for the joints."),
];

impl WisdomDeck {
    /// Built-in deck used whenever the provider cannot deliver.
    pub fn fallback() -> Self {
        Self {
            tips: FALLBACK
                .iter()
                .map(|(category, text)| WisdomTip {
                    category: *category,
                    text: (*text).to_string(),
                })
                .collect(),
            ai_available: false,
        }
    }
}

/// Prompt for a batch of tips, with the user's context when present.
pub fn wisdom_prompt(custom_instructions: Option<&str>) -> String {
    match custom_instructions {
        Some(context) => format!("Generate 10 desk health tips. User Context: \"{context}\"."),
        None => "Generate 10 desk health tips.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_deck_has_eight_tips() {
        let deck = WisdomDeck::fallback();
        assert_eq!(deck.tips.len(), 8);
        assert!(!deck.ai_available);
        assert_eq!(deck.tips[7].text, "Motion is lotion for the joints.");
    }

    #[test]
    fn tips_parse_from_backend_json() {
        let tips: Vec<WisdomTip> =
            serde_json::from_str(r#"[{"category":"Hack","text":"Raise your screen."}]"#).unwrap();
        assert_eq!(tips[0].category, TipCategory::Hack);
    }

    #[test]
    fn prompt_includes_context() {
        assert!(wisdom_prompt(Some("lower back pain")).contains("lower back pain"));
        assert!(!wisdom_prompt(None).contains("Context"));
    }
}
