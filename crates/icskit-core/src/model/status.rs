use std::fmt;
use std::str::FromStr;

use crate::error::CodecError;

/// Status of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Confirmed,
    Cancelled,
}

impl Status {
    pub const ALL: [Status; 2] = [Self::Confirmed, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Returns true if `value` names a supported status.
    pub fn exists(value: &str) -> bool {
        Self::ALL.iter().any(|status| status.as_str() == value)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = CodecError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| CodecError::invalid_argument(value, "status"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses() {
        assert!(Status::exists("CONFIRMED"));
        assert!(Status::exists("CANCELLED"));
        assert!(!Status::exists("TENTATIVE"));
        assert_eq!("CANCELLED".parse::<Status>().unwrap(), Status::Cancelled);
        assert_eq!(Status::default().to_string(), "CONFIRMED");
    }

    #[test]
    fn unknown_status_is_invalid_argument() {
        let err = "DONE".parse::<Status>().unwrap_err();
        assert_eq!(err.attribute(), Some("status"));
    }
}
