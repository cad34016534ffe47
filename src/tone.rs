//! Caption tones and the instruction each one feeds the model.

/// Controls the style of the generated caption.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Tone {
    /// Polished and concise
    Professional,
    /// Witty, the default
    #[default]
    Funny,
    /// Chaotic slang and emojis
    Unhinge,
}

impl Tone {
    /// All tones, in the order the mode selector shows them.
    pub const ALL: [Tone; 3] = [Tone::Professional, Tone::Funny, Tone::Unhinge];

    /// Parse used for the `mode` field. Names match exactly; missing or unknown values fall back to [`Tone::Funny`].
    pub fn from_mode(mode: Option<&str>) -> Self {
        match mode {
            Some("professional") => Tone::Professional,
            Some("unhinge") | Some("unhinged") => Tone::Unhinge,
            _ => Tone::Funny,
        }
    }

    /// The name sent over the wire as `mode`.
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Funny => "funny",
            Tone::Unhinge => "unhinge",
        }
    }

    /// The tone rule included in the model instruction.
    pub fn instruction(self) -> &'static str {
        match self {
            Tone::Professional => "Professional, polished, inspiring, concise tone.",
            Tone::Funny => "Witty, humorous tone with light wordplay.",
            Tone::Unhinge => "Chaotic, slang-heavy, heavily emoji-laden tone.",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tone {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Tone::from_mode(Some(s)))
    }
}
