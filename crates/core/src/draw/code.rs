//! Redemption code generation
//!
//! Codes are short, uppercase and avoid characters that are easy to misread
//! (`0/O`, `1/I`). They are opaque secrets: the code -> assignment mapping is
//! the only thing keeping one giver's recipient from another.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::{Error, Result};

/// Characters a code may contain
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of every issued code
pub const CODE_LENGTH: usize = 6;

/// Regeneration cap per code when a candidate collides with one already issued
pub const MAX_CODE_ATTEMPTS: u32 = 1000;

/// Produces random codes over a fixed alphabet
#[derive(Debug, Clone, Copy)]
pub struct CodeGenerator {
    alphabet: &'static [u8],
    length: usize,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            alphabet: CODE_ALPHABET,
            length: CODE_LENGTH,
        }
    }
}

impl CodeGenerator {
    pub fn new(alphabet: &'static [u8], length: usize) -> Self {
        Self { alphabet, length }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Draw one code, each position uniform over the alphabet
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        (0..self.length)
            .filter_map(|_| self.alphabet.choose(rng))
            .map(|&b| char::from(b))
            .collect()
    }

    /// Whether a code could have come from this generator
    pub fn is_well_formed(&self, code: &str) -> bool {
        code.len() == self.length && code.bytes().all(|b| self.alphabet.contains(&b))
    }

    /// Start a fresh issuer that guarantees uniqueness within one draw
    pub fn issuer(&self) -> CodeIssuer<'_> {
        CodeIssuer {
            generator: self,
            issued: HashSet::new(),
        }
    }
}

/// Hands out codes that are pairwise distinct
pub struct CodeIssuer<'g> {
    generator: &'g CodeGenerator,
    issued: HashSet<String>,
}

impl CodeIssuer<'_> {
    pub fn issue<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = self.generator.generate(rng);
            if self.issued.insert(code.clone()) {
                return Ok(code);
            }
            debug!(attempt, "Code collision, regenerating");
        }

        Err(Error::CodeSpaceExhausted {
            issued: self.issued.len(),
        })
    }
}
