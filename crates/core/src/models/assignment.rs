//! Assignment model and the views derived from it

use serde::{Deserialize, Serialize};

/// One giver -> receiver pairing, keyed by its redemption code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub giver: String,
    pub receiver: String,
    pub code: String,
}

impl Assignment {
    /// Exact match after trimming, ignoring case
    pub fn matches_code(&self, input: &str) -> bool {
        self.code.eq_ignore_ascii_case(input.trim())
    }

    /// Distribution view: giver and code, never the receiver
    pub fn code_entry(&self) -> CodeEntry<'_> {
        CodeEntry {
            giver: &self.giver,
            code: &self.code,
        }
    }

    pub fn revelation(&self) -> Revelation {
        Revelation {
            giver: self.giver.clone(),
            receiver: self.receiver.clone(),
        }
    }
}

/// A giver and the code handed to them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeEntry<'a> {
    pub giver: &'a str,
    pub code: &'a str,
}

/// The single pair exposed after a successful redemption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revelation {
    pub giver: String,
    pub receiver: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_assignment() -> Assignment {
        Assignment {
            giver: "Alice".to_string(),
            receiver: "Bob".to_string(),
            code: "K7QX2M".to_string(),
        }
    }

    #[test]
    fn test_matches_code_trimmed_case_insensitive() {
        let a = make_assignment();
        assert!(a.matches_code("K7QX2M"));
        assert!(a.matches_code("k7qx2m"));
        assert!(a.matches_code("  k7Qx2m\n"));
    }

    #[test]
    fn test_matches_code_requires_exact_length() {
        let a = make_assignment();
        assert!(!a.matches_code("K7QX2"));
        assert!(!a.matches_code("K7QX2MM"));
        assert!(!a.matches_code(""));
    }

    #[test]
    fn test_code_entry_hides_receiver() {
        let a = make_assignment();
        let entry = a.code_entry();
        assert_eq!(entry.giver, "Alice");
        assert_eq!(entry.code, "K7QX2M");
    }
}
