//! Reveal session state machine
//!
//! ```text
//! Setup --draw--> Codes --continue--> Reveal/AwaitingCode <--dismiss-- Reveal/Revealed
//!                                            |                              ^
//!                                            +-----------redeem-------------+
//! ```
//!
//! Reset returns to Setup from anywhere. A session that starts with a stored
//! draw resumes directly in Reveal/AwaitingCode.

mod controller;
mod dispatch;

pub use controller::SessionController;
pub use dispatch::{Action, Outcome};

/// Sub-state of the reveal phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    AwaitingCode,
    Revealed,
}

/// Top-level phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Roster editing, no draw committed
    Setup,
    /// Draw committed, codes being handed out
    Codes,
    /// Participants redeem codes one at a time
    Reveal(RevealState),
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Codes => "code distribution",
            Phase::Reveal(RevealState::AwaitingCode) => "reveal (awaiting code)",
            Phase::Reveal(RevealState::Revealed) => "reveal (showing result)",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
