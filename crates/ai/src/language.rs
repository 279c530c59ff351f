use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operator interface language, also the target language for generated copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    De,
    En,
    /// Swiss German.
    Ch,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
            Language::Ch => "ch",
        }
    }

    /// Language description handed to the copywriter prompt.
    pub fn target_language(&self) -> &'static str {
        match self {
            Language::De => "German",
            Language::En => "English",
            Language::Ch => {
                "Swiss German (Standard German with swiss nuances if appropriate for e-commerce, otherwise Standard German)"
            }
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "de" => Ok(Language::De),
            "en" => Ok(Language::En),
            "ch" => Ok(Language::Ch),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}
