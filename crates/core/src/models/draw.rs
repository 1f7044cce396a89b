//! Draw result model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Assignment, CodeEntry};

/// The immutable output of one draw.
///
/// Assignments are kept in roster order. Once constructed nothing in the
/// crate hands out mutable access, so the persisted record and the copy held
/// by the session stay identical until reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawResult {
    id: Uuid,
    drawn_at: DateTime<Utc>,
    #[serde(rename = "results")]
    assignments: Vec<Assignment>,
}

impl DrawResult {
    pub(crate) fn new(assignments: Vec<Assignment>) -> Self {
        Self {
            id: Uuid::new_v4(),
            drawn_at: Utc::now(),
            assignments,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn drawn_at(&self) -> DateTime<Utc> {
        self.drawn_at
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Look up the one assignment a code identifies
    pub fn find_by_code(&self, input: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.matches_code(input))
    }

    /// Giver/code pairs for distribution, in roster order
    pub fn code_entries(&self) -> impl Iterator<Item = CodeEntry<'_>> {
        self.assignments.iter().map(Assignment::code_entry)
    }

    /// Text for the bulk clipboard copy: one `giver: code` line per assignment
    pub fn bulk_code_text(&self) -> String {
        self.code_entries()
            .map(|e| format!("{}: {}", e.giver, e.code))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Printable code sheet. Receivers never appear on it.
    pub fn code_sheet(&self) -> String {
        let width = self
            .code_entries()
            .map(|e| e.giver.chars().count())
            .max()
            .unwrap_or(0);

        let mut sheet = format!(
            "Gift exchange codes\nDrawn {}\n\n",
            self.drawn_at.format("%Y-%m-%d %H:%M UTC")
        );
        for entry in self.code_entries() {
            sheet.push_str(&format!("{:<width$}  {}\n", entry.giver, entry.code));
        }
        sheet.push_str("\nEach person types their own code alone to see who they drew.\n");
        sheet
    }
}
