//! Gerrit `Change-Id` trailer extraction.
//!
//! A Change-Id line looks like `Change-Id: Ibd6b990eb12f6b1464b1d139fb51c0898e5b073e`.
//! The identifier starts with `I` and at least eight lowercase hex digits, and
//! runs up to the first whitespace.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

const CHANGE_ID_PATTERN: &str = r"(?m)^Change-Id: (I[0-9a-f]{8,}\S*)";

fn change_id_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(CHANGE_ID_PATTERN).expect("Change-Id pattern is valid"))
}

/// Review identifier taken from a commit message trailer.
///
/// Two commits belong to the same review iff their identifiers are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChangeId(String);

impl ChangeId {
    /// Returns the first well-formed Change-Id in `message`, if any.
    pub fn from_message(message: &str) -> Option<Self> {
        change_id_regex()
            .captures(message)
            .and_then(|caps| caps.get(1))
            .map(|m| Self(m.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_trailer() {
        let id = ChangeId::from_message("Fix bug\n\nChange-Id: Iabc123def4567890").unwrap();
        assert_eq!(id.as_str(), "Iabc123def4567890");
    }

    #[test]
    fn test_full_length_gerrit_id() {
        let message = "Add parser\n\nSigned-off-by: Dev <dev@example.com>\nChange-Id: Ibd6b990eb12f6b1464b1d139fb51c0898e5b073e\n";
        let id = ChangeId::from_message(message).unwrap();
        assert_eq!(id.to_string(), "Ibd6b990eb12f6b1464b1d139fb51c0898e5b073e");
    }

    #[test]
    fn test_too_short_id_is_ignored() {
        assert!(ChangeId::from_message("Fix\n\nChange-Id: Iabc1234").is_none());
        assert!(ChangeId::from_message("Fix\n\nChange-Id: I1234567").is_none());
    }

    #[test]
    fn test_minimum_length_accepted() {
        let id = ChangeId::from_message("Fix\n\nChange-Id: I12345678").unwrap();
        assert_eq!(id.as_str(), "I12345678");
    }

    #[test]
    fn test_trailer_must_start_a_line() {
        assert!(ChangeId::from_message("Fix (see Change-Id: Iabc123def4567890)").is_none());
    }

    #[test]
    fn test_uppercase_hex_or_missing_prefix_rejected() {
        assert!(ChangeId::from_message("Change-Id: IABC123DEF4567890").is_none());
        assert!(ChangeId::from_message("Change-Id: abc123def4567890").is_none());
        assert!(ChangeId::from_message("Change-ID: Iabc123def4567890").is_none());
    }

    #[test]
    fn test_first_trailer_wins() {
        let message = "Squash\n\nChange-Id: I1111111111\nChange-Id: I2222222222\n";
        assert_eq!(
            ChangeId::from_message(message).unwrap().as_str(),
            "I1111111111"
        );
    }

    #[test]
    fn test_id_ends_at_whitespace() {
        let id = ChangeId::from_message("Fix\n\nChange-Id: Iabc123def4567890 \r\n").unwrap();
        assert_eq!(id.as_str(), "Iabc123def4567890");

        let id = ChangeId::from_message("Fix\n\nChange-Id: Iabc123def4567890 (cherry-pick)").unwrap();
        assert_eq!(id.as_str(), "Iabc123def4567890");
    }

    #[test]
    fn test_suffix_after_hex_distinguishes_ids() {
        let foo = ChangeId::from_message("Fix\n\nChange-Id: I12345678-foo\n").unwrap();
        let bar = ChangeId::from_message("Fix\n\nChange-Id: I12345678-bar\n").unwrap();

        assert_eq!(foo.as_str(), "I12345678-foo");
        assert_ne!(foo, bar);
    }

    #[test]
    fn test_no_trailer() {
        assert!(ChangeId::from_message("Plain commit message").is_none());
        assert!(ChangeId::from_message("").is_none());
    }
}
