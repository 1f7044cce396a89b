//! Action dispatch
//!
//! Interactive surfaces turn user input into [`Action`] values and hand them
//! to [`SessionController::dispatch`]. The dispatcher performs exactly one
//! transition per action and reaches out to the collaborators for the side
//! effects that are not part of the session itself.

use tracing::{debug, warn};

use super::{Phase, SessionController};
use crate::collaborators::Collaborators;
use crate::error::{Error, Result};
use crate::models::Revelation;
use crate::storage::DrawRepository;

/// Prompt shown before a reset
pub const RESET_PROMPT: &str =
    "Start a new draw? This erases the current draw and every code issued for it.";

/// Something the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddParticipant(String),
    RemoveParticipant(String),
    Draw,
    /// Copy one giver's code
    CopyCode(String),
    CopyAllCodes,
    PrintCodes,
    ContinueToReveal,
    Redeem(String),
    Dismiss,
    Reset,
}

/// What an action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Rejected without an error worth showing
    Unchanged,
    RosterChanged,
    Drawn { participants: usize },
    /// A single code was copied
    CodeCopied { code: String },
    AllCodesCopied,
    Printed,
    PhaseChanged(Phase),
    Revealed(Revelation),
    ResetDone,
    ResetCancelled,
}

impl<S: DrawRepository> SessionController<S> {
    /// Apply one user action
    pub fn dispatch(&mut self, action: Action, collab: &mut Collaborators<'_>) -> Result<Outcome> {
        match action {
            Action::AddParticipant(name) => match self.add_participant(&name) {
                Ok(()) => Ok(Outcome::RosterChanged),
                Err(Error::DuplicateOrEmptyName(reason)) => {
                    debug!(%reason, "Add ignored");
                    Ok(Outcome::Unchanged)
                }
                Err(e) => Err(e),
            },
            Action::RemoveParticipant(name) => {
                if self.remove_participant(&name)? {
                    Ok(Outcome::RosterChanged)
                } else {
                    Ok(Outcome::Unchanged)
                }
            }
            Action::Draw => {
                self.draw()?;
                Ok(Outcome::Drawn {
                    participants: self.committed_len().unwrap_or(0),
                })
            }
            Action::CopyCode(giver) => {
                let Some(code) = self.code_for(&giver)?.map(str::to_string) else {
                    return Ok(Outcome::Unchanged);
                };
                copy(collab, &code)?;
                Ok(Outcome::CodeCopied { code })
            }
            Action::CopyAllCodes => {
                let text = self.bulk_code_text()?;
                copy(collab, &text)?;
                Ok(Outcome::AllCodesCopied)
            }
            Action::PrintCodes => {
                let sheet = self.code_sheet()?;
                collab.printer.print(&sheet)?;
                Ok(Outcome::Printed)
            }
            Action::ContinueToReveal => {
                self.continue_to_reveal()?;
                Ok(Outcome::PhaseChanged(self.phase()))
            }
            Action::Redeem(input) => Ok(Outcome::Revealed(self.redeem(&input)?.clone())),
            Action::Dismiss => {
                self.dismiss()?;
                Ok(Outcome::PhaseChanged(self.phase()))
            }
            Action::Reset => {
                if !collab.confirm.confirm(RESET_PROMPT) {
                    return Ok(Outcome::ResetCancelled);
                }
                self.reset()?;
                Ok(Outcome::ResetDone)
            }
        }
    }
}

fn copy(collab: &mut Collaborators<'_>, text: &str) -> Result<()> {
    collab.clipboard.copy(text).map_err(|e| {
        warn!(error = %e, "Clipboard write failed");
        e
    })
}
