//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These are compiled out in release builds. `check_stored_draw` is the one
//! runtime check: records read back from storage are not trusted.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::{DrawResult, Participant};

/// Reject a loaded draw that could not have come out of the draw engine
pub fn check_stored_draw(result: &DrawResult) -> Result<()> {
    let corrupt = |reason: String| Err(Error::CorruptRecord(reason));

    if result.is_empty() {
        return corrupt("no assignments".to_string());
    }

    let mut givers = HashSet::new();
    let mut codes = HashSet::new();
    for a in result.assignments() {
        if a.giver.to_lowercase() == a.receiver.to_lowercase() {
            return corrupt(format!("{} is assigned to themselves", a.giver));
        }
        if !givers.insert(a.giver.to_lowercase()) {
            return corrupt(format!("{} appears twice as a giver", a.giver));
        }
        if !codes.insert(a.code.to_ascii_uppercase()) {
            return corrupt("two assignments share a code".to_string());
        }
    }

    let receivers: HashSet<String> = result
        .assignments()
        .iter()
        .map(|a| a.receiver.to_lowercase())
        .collect();
    if receivers != givers {
        return corrupt("receivers do not match the givers".to_string());
    }

    Ok(())
}

/// Validate that a draw result pairs the roster with itself, with no
/// self-assignment and no repeated code
pub fn assert_draw_invariants(result: &DrawResult, roster: &[Participant]) {
    debug_assert_eq!(
        result.len(),
        roster.len(),
        "Draw {} has {} assignments for {} participants",
        result.id(),
        result.len(),
        roster.len()
    );

    for (assignment, participant) in result.assignments().iter().zip(roster) {
        debug_assert_eq!(
            assignment.giver,
            participant.name,
            "Draw {} givers are out of roster order",
            result.id()
        );
        debug_assert_ne!(
            assignment.giver,
            assignment.receiver,
            "Draw {} assigns a giver to themselves",
            result.id()
        );
    }

    let receivers: HashSet<&str> = result
        .assignments()
        .iter()
        .map(|a| a.receiver.as_str())
        .collect();
    debug_assert!(
        receivers.len() == result.len() && roster.iter().all(|p| receivers.contains(p.name.as_str())),
        "Draw {} receivers are not a permutation of the roster",
        result.id()
    );

    assert_unique_codes(result);
}

/// Validate that no two assignments share a code
pub fn assert_unique_codes(result: &DrawResult) {
    let codes: HashSet<&str> = result.assignments().iter().map(|a| a.code.as_str()).collect();
    debug_assert_eq!(
        codes.len(),
        result.len(),
        "Draw {} has duplicate codes",
        result.id()
    );
}
