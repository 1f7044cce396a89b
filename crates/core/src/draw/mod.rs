//! Draw engine
//!
//! Pairs every participant with a recipient other than themselves and issues
//! one redemption code per pairing.
//!
//! The pairing is found by rejection sampling: shuffle the roster, keep the
//! shuffle if nobody landed on their own position, otherwise shuffle again.
//! Roughly 1/e of uniform permutations are derangements, so a handful of
//! attempts is normal and the cap is only hit by a broken random source.

mod code;

pub use code::{CodeGenerator, CodeIssuer, CODE_ALPHABET, CODE_LENGTH, MAX_CODE_ATTEMPTS};

use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};
use crate::invariants::assert_draw_invariants;
use crate::models::{Assignment, DrawResult, Participant};
use crate::roster::Roster;

/// Smallest roster a draw accepts
pub const MIN_PARTICIPANTS: usize = 3;

/// Shuffles tried before a draw is reported as failed
pub const MAX_DRAW_ATTEMPTS: u32 = 100;

/// Produces draw results from a roster using the given random source
pub struct DrawEngine<R = ThreadRng> {
    rng: R,
    max_attempts: u32,
    codes: CodeGenerator,
}

impl Default for DrawEngine<ThreadRng> {
    fn default() -> Self {
        Self::with_rng(rand::thread_rng())
    }
}

impl DrawEngine<ThreadRng> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: Rng> DrawEngine<R> {
    /// Create an engine over a specific random source (e.g. a seeded one)
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            max_attempts: MAX_DRAW_ATTEMPTS,
            codes: CodeGenerator::default(),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_code_generator(mut self, codes: CodeGenerator) -> Self {
        self.codes = codes;
        self
    }

    /// Run one draw over the roster
    pub fn draw(&mut self, roster: &Roster) -> Result<DrawResult> {
        let participants = roster.participants();
        if participants.len() < MIN_PARTICIPANTS {
            return Err(Error::InsufficientParticipants {
                count: participants.len(),
            });
        }

        let receivers = self.find_derangement(participants)?;

        let mut issuer = self.codes.issuer();
        let mut assignments = Vec::with_capacity(participants.len());
        for (giver, receiver) in participants.iter().zip(receivers) {
            assignments.push(Assignment {
                giver: giver.name.clone(),
                receiver: receiver.name,
                code: issuer.issue(&mut self.rng)?,
            });
        }

        let result = DrawResult::new(assignments);
        assert_draw_invariants(&result, participants);
        Ok(result)
    }

    fn find_derangement(&mut self, participants: &[Participant]) -> Result<Vec<Participant>> {
        let mut shuffled = participants.to_vec();

        for attempt in 1..=self.max_attempts {
            shuffled.shuffle(&mut self.rng);

            let no_fixed_point = participants
                .iter()
                .zip(&shuffled)
                .all(|(p, s)| p.name != s.name);

            if no_fixed_point {
                debug!(attempt, size = participants.len(), "Found derangement");
                return Ok(shuffled);
            }
        }

        Err(Error::DrawFailed {
            attempts: self.max_attempts,
        })
    }
}

/// Draw with the thread-local random source
pub fn draw(roster: &Roster) -> Result<DrawResult> {
    DrawEngine::new().draw(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn roster_of(size: usize) -> Roster {
        (0..size).map(|i| format!("Person {i}")).collect()
    }

    fn assert_valid_draw(result: &DrawResult, roster: &Roster) {
        assert_eq!(result.len(), roster.len());

        let mut givers: Vec<&str> = result.assignments().iter().map(|a| a.giver.as_str()).collect();
        let mut receivers: Vec<&str> = result
            .assignments()
            .iter()
            .map(|a| a.receiver.as_str())
            .collect();
        let mut expected: Vec<&str> = roster.participants().iter().map(|p| p.name.as_str()).collect();
        givers.sort_unstable();
        receivers.sort_unstable();
        expected.sort_unstable();
        assert_eq!(givers, expected);
        assert_eq!(receivers, expected);

        let codes: HashSet<&str> = result.assignments().iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes.len(), result.len());

        let generator = CodeGenerator::default();
        for a in result.assignments() {
            assert_ne!(a.giver, a.receiver);
            assert!(generator.is_well_formed(&a.code));
        }
    }

    #[test]
    fn test_draw_is_derangement_across_sizes_and_seeds() {
        for size in 3..=12 {
            let roster = roster_of(size);
            for seed in 0..25 {
                let mut engine = DrawEngine::with_rng(StdRng::seed_from_u64(seed));
                let result = engine.draw(&roster).unwrap();
                assert_valid_draw(&result, &roster);
            }
        }
    }

    #[test]
    fn test_givers_in_roster_order() {
        let roster: Roster = ["Carol", "Alice", "Bob"].into_iter().collect();
        let result = draw(&roster).unwrap();
        let givers: Vec<&str> = result.assignments().iter().map(|a| a.giver.as_str()).collect();
        assert_eq!(givers, vec!["Carol", "Alice", "Bob"]);
    }

    #[test]
    fn test_three_people_form_a_cycle() {
        // The only derangements of three are the two 3-cycles
        let roster: Roster = ["Alice", "Bob", "Carol"].into_iter().collect();
        for seed in 0..20 {
            let mut engine = DrawEngine::with_rng(StdRng::seed_from_u64(seed));
            let result = engine.draw(&roster).unwrap();
            let receiver_of = |giver: &str| -> String {
                result
                    .assignments()
                    .iter()
                    .find(|a| a.giver == giver)
                    .map(|a| a.receiver.clone())
                    .unwrap()
            };
            let second = receiver_of("Alice");
            let third = receiver_of(&second);
            assert_ne!(third, "Alice");
            assert_eq!(receiver_of(&third), "Alice");
        }
    }

    #[test]
    fn test_same_seed_same_pairings() {
        let roster = roster_of(8);
        let first = DrawEngine::with_rng(StdRng::seed_from_u64(42))
            .draw(&roster)
            .unwrap();
        let second = DrawEngine::with_rng(StdRng::seed_from_u64(42))
            .draw(&roster)
            .unwrap();
        assert_eq!(first.assignments(), second.assignments());
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_insufficient_participants() {
        for size in 0..MIN_PARTICIPANTS {
            let err = draw(&roster_of(size)).unwrap_err();
            assert!(matches!(err, Error::InsufficientParticipants { count } if count == size));
        }
    }

    #[test]
    fn test_draw_failed_when_attempts_exhausted() {
        let mut engine = DrawEngine::with_rng(StdRng::seed_from_u64(1)).with_max_attempts(0);
        let err = engine.draw(&roster_of(5)).unwrap_err();
        assert!(matches!(err, Error::DrawFailed { attempts: 0 }));
    }

    #[test]
    fn test_degenerate_code_space_fails_draw() {
        let mut engine = DrawEngine::with_rng(StdRng::seed_from_u64(5))
            .with_code_generator(CodeGenerator::new(b"AB", 1));
        let err = engine.draw(&roster_of(3)).unwrap_err();
        assert!(matches!(err, Error::CodeSpaceExhausted { issued: 2 }));
    }
}
