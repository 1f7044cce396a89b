//! Roster management
//!
//! An ordered, case-insensitively unique list of participants.

use thiserror::Error;

use crate::models::Participant;

/// Why an add left the roster unchanged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Name is empty")]
    Empty,

    #[error("{0} is already on the roster")]
    Duplicate(String),
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a participant by name.
    ///
    /// The name is trimmed first. Empty names and names already present
    /// (compared without case) are rejected and the roster is left as it was.
    pub fn add(&mut self, name: &str) -> Result<&Participant, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::Empty);
        }

        if let Some(existing) = self.participants.iter().find(|p| p.same_name(name)) {
            return Err(RosterError::Duplicate(existing.name.clone()));
        }

        self.participants.push(Participant::new(name));
        Ok(&self.participants[self.participants.len() - 1])
    }

    /// Remove the participant whose name matches exactly.
    /// Returns false if nobody matched.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| p.name != name);
        self.participants.len() != before
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn clear(&mut self) {
        self.participants.clear();
    }
}

impl<S: AsRef<str>> FromIterator<S> for Roster {
    /// Build a roster, silently skipping rejected names
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut roster = Roster::new();
        for name in iter {
            let _ = roster.add(name.as_ref());
        }
        roster
    }
}
