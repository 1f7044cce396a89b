//! Error types for giftdraw core

use thiserror::Error;

use crate::roster::RosterError;
use crate::session::Phase;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("At least 3 participants are required, found {count}")]
    InsufficientParticipants { count: usize },

    #[error("Could not find a valid draw after {attempts} attempts, try again")]
    DrawFailed { attempts: u32 },

    #[error("Could not issue a unique code after {issued} codes")]
    CodeSpaceExhausted { issued: usize },

    #[error("Roster unchanged: {0}")]
    DuplicateOrEmptyName(#[from] RosterError),

    #[error("Invalid code, check it and try again")]
    InvalidCode,

    #[error("Please type your code")]
    EmptyCode,

    #[error("Cannot {action} during {phase}")]
    WrongPhase { action: &'static str, phase: Phase },

    #[error("A draw is already committed for this session")]
    AlreadyCommitted,

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored draw is not valid: {0}")]
    CorruptRecord(String),
}

impl Error {
    /// Whether this error means the stored draw itself is unreadable
    pub fn is_corrupt_record(&self) -> bool {
        matches!(self, Error::Serialization(_) | Error::CorruptRecord(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
