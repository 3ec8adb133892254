use std::fmt;
use std::str::FromStr;

use crate::error::CodecError;

/// Language of the text values of a calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    Es,
    #[default]
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Self::Es, Self::En];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Es => "ES",
            Self::En => "EN",
        }
    }

    /// Returns true if `value` names a supported language.
    pub fn exists(value: &str) -> bool {
        Self::ALL.iter().any(|language| language.as_str() == value)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = CodecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|language| language.as_str() == value)
            .ok_or_else(|| CodecError::invalid_argument(value, "language"))
    }
}
