//! Offline caption generator used when the generation service can't be reached.
//!
//! Rule based and deterministic: the same idea always produces the same caption.

use serde::Serialize;

/// Style suffixes appended to the idea, in order, to make the three image prompts.
pub const FALLBACK_IMAGE_SUFFIXES: [&str; 3] = [
    " cinematic lighting 4k",
    " aesthetic minimal high quality",
    " vibrant artistic style",
];

struct KeywordRule {
    keywords: &'static [&'static str],
    caption: &'static str,
}

/// Checked top to bottom, first match wins.
const RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["morning"],
        caption: "Rise and shine, Farcaster fam! ☀️☕️ \n\nAnother day to build, create, and connect. Let's make this one count. What's everyone working on today? 👇 \n\n#GoodMorning #BuilderEnergy #Warpcast",
    },
    KeywordRule {
        keywords: &["gym", "workout"],
        caption: "Sweat now, shine later. 💪😤 \n\nJust crushed a session and feeling absolutely unstoppable. Remember: consistency is the only cheat code. \n\n#FitnessJourney #GrindMode",
    },
    KeywordRule {
        keywords: &["coffee"],
        caption: "Life begins after coffee. ☕️✨ \n\nFueling up for a massive day ahead. If you're reading this, go get that caffeine fix. \n\n#CoffeeVibes #Focus",
    },
    KeywordRule {
        keywords: &["code", "build"],
        caption: "Ship. Sleep. Repeat. 💻🚀 \n\nDeep in the code mines today building something special. The bugs don't stand a chance. \n\n#BuildInPublic #DevLife",
    },
];

const GENERIC_FLOURISH: &str = "Sometimes the simple moments hit different. Just wanted to share this vibe with you all. Hope everyone is having a legendary day! 🚀\n\n#Vibes #Farcaster #Moments";

/// Caption plus image prompts, before any URLs are derived.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CaptionDraft {
    /// Caption text
    pub caption: String,
    /// Exactly three prompts
    pub image_prompts: Vec<String>,
}

/// Produces a draft for `idea`. Never fails.
pub fn generate(idea: &str) -> CaptionDraft {
    let lower = idea.to_lowercase();
    let caption = RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|rule| rule.caption.to_string())
        .unwrap_or_else(|| format!("\"{idea}\" ✨\n\n{GENERIC_FLOURISH}"));

    CaptionDraft {
        caption,
        image_prompts: FALLBACK_IMAGE_SUFFIXES
            .iter()
            .map(|suffix| format!("{idea}{suffix}"))
            .collect(),
    }
}
