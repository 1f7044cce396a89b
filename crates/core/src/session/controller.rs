//! Session controller
//!
//! Owns the roster, the committed draw and the store it was written to.
//! Every public operation is either one transition or one rejection; a
//! rejected operation leaves every field as it was.

use rand::Rng;
use tracing::{debug, info, warn};

use super::{Phase, RevealState};
use crate::collaborators::Confirm;
use crate::draw::DrawEngine;
use crate::error::{Error, Result};
use crate::models::{CodeEntry, DrawResult, Participant, Revelation};
use crate::roster::Roster;
use crate::storage::DrawRepository;

const RECOVER_PROMPT: &str = "The saved draw cannot be read. Discard it and start over?";

pub struct SessionController<S> {
    store: S,
    roster: Roster,
    committed: Option<DrawResult>,
    phase: Phase,
    revealed: Option<Revelation>,
}

impl<S: DrawRepository> SessionController<S> {
    /// Start a session over a store, resuming a committed draw if one exists
    pub fn start(store: S) -> Result<Self> {
        let committed = store.load_draw()?;
        Ok(Self::resume(store, committed))
    }

    /// Like `start`, but an unreadable stored draw can be discarded after
    /// confirmation instead of blocking startup
    pub fn start_or_recover(store: S, confirm: &mut dyn Confirm) -> Result<Self> {
        match store.load_draw() {
            Ok(committed) => Ok(Self::resume(store, committed)),
            Err(e) if e.is_corrupt_record() => {
                warn!(error = %e, "Stored draw is unreadable");
                if !confirm.confirm(RECOVER_PROMPT) {
                    return Err(e);
                }
                store.delete_draw()?;
                info!("Unreadable draw discarded");
                Ok(Self::resume(store, None))
            }
            Err(e) => Err(e),
        }
    }

    fn resume(store: S, committed: Option<DrawResult>) -> Self {
        let phase = match &committed {
            Some(result) => {
                info!(
                    draw_id = %result.id(),
                    participants = result.len(),
                    "Resuming committed draw"
                );
                Phase::Reveal(RevealState::AwaitingCode)
            }
            None => {
                info!("No committed draw, starting setup");
                Phase::Setup
            }
        };

        Self {
            store,
            roster: Roster::new(),
            committed,
            phase,
            revealed: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn participants(&self) -> &[Participant] {
        self.roster.participants()
    }

    /// Number of assignments in the committed draw, if any
    pub fn committed_len(&self) -> Option<usize> {
        self.committed.as_ref().map(DrawResult::len)
    }

    fn require(&self, expected: Phase, action: &'static str) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(Error::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }

    fn committed_in(&self, expected: Phase, action: &'static str) -> Result<&DrawResult> {
        self.require(expected, action)?;
        self.committed.as_ref().ok_or(Error::WrongPhase {
            action,
            phase: self.phase,
        })
    }

    pub fn add_participant(&mut self, name: &str) -> Result<()> {
        self.require(Phase::Setup, "add a participant")?;
        let added = self.roster.add(name)?.name.clone();
        debug!(participant = %added, count = self.roster.len(), "Participant added");
        Ok(())
    }

    /// Remove by exact name. Returns false if nobody matched.
    pub fn remove_participant(&mut self, name: &str) -> Result<bool> {
        self.require(Phase::Setup, "remove a participant")?;
        Ok(self.roster.remove(name))
    }

    /// Draw with the thread-local random source and commit the result
    pub fn draw(&mut self) -> Result<()> {
        self.draw_with(&mut DrawEngine::new())
    }

    /// Draw with a caller-supplied engine and commit the result.
    ///
    /// The result is persisted before the session moves on; if the store
    /// refuses the write the session stays in setup.
    pub fn draw_with<R: Rng>(&mut self, engine: &mut DrawEngine<R>) -> Result<()> {
        self.require(Phase::Setup, "draw")?;

        let result = engine.draw(&self.roster)?;
        self.store.save_draw(&result)?;

        info!(
            draw_id = %result.id(),
            participants = result.len(),
            "Draw committed"
        );
        self.committed = Some(result);
        self.phase = Phase::Codes;
        Ok(())
    }

    /// Giver/code pairs for distribution
    pub fn codes(&self) -> Result<Vec<CodeEntry<'_>>> {
        Ok(self
            .committed_in(Phase::Codes, "list codes")?
            .code_entries()
            .collect())
    }

    /// Code of one giver, for the single-code copy
    pub fn code_for(&self, giver: &str) -> Result<Option<&str>> {
        Ok(self
            .committed_in(Phase::Codes, "copy a code")?
            .code_entries()
            .find(|e| e.giver == giver)
            .map(|e| e.code))
    }

    /// All codes as `giver: code` lines
    pub fn bulk_code_text(&self) -> Result<String> {
        Ok(self
            .committed_in(Phase::Codes, "copy all codes")?
            .bulk_code_text())
    }

    pub fn code_sheet(&self) -> Result<String> {
        Ok(self.committed_in(Phase::Codes, "print codes")?.code_sheet())
    }

    /// Leave code distribution for the reveal phase
    pub fn continue_to_reveal(&mut self) -> Result<()> {
        self.require(Phase::Codes, "continue to reveal")?;
        self.phase = Phase::Reveal(RevealState::AwaitingCode);
        Ok(())
    }

    /// Exchange a code for the single assignment it identifies
    pub fn redeem(&mut self, input: &str) -> Result<&Revelation> {
        let committed = self.committed_in(Phase::Reveal(RevealState::AwaitingCode), "redeem a code")?;

        if input.trim().is_empty() {
            return Err(Error::EmptyCode);
        }

        let Some(assignment) = committed.find_by_code(input) else {
            warn!(draw_id = %committed.id(), "Code redemption failed");
            return Err(Error::InvalidCode);
        };

        let revelation = assignment.revelation();
        info!(draw_id = %committed.id(), "Code redeemed");
        self.phase = Phase::Reveal(RevealState::Revealed);
        Ok(self.revealed.insert(revelation))
    }

    /// The pair currently on screen, if any
    pub fn revealed(&self) -> Option<&Revelation> {
        self.revealed.as_ref()
    }

    /// Hide the revealed pair so the next person can redeem
    pub fn dismiss(&mut self) -> Result<()> {
        self.require(Phase::Reveal(RevealState::Revealed), "go back")?;
        self.revealed = None;
        self.phase = Phase::Reveal(RevealState::AwaitingCode);
        Ok(())
    }

    /// Destroy the stored draw and start over with an empty roster.
    ///
    /// Valid from any phase, including when nothing was ever drawn.
    pub fn reset(&mut self) -> Result<()> {
        let removed = self.store.delete_draw()?;

        self.roster.clear();
        self.committed = None;
        self.revealed = None;
        self.phase = Phase::Setup;

        info!(removed, "Session reset");
        Ok(())
    }
}
