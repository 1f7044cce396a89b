//! giftdraw core library
//!
//! Secret gift-exchange draws: roster management, the derangement draw with
//! redemption codes, and the reveal session that hands each giver their own
//! recipient and nothing else.

pub mod collaborators;
pub mod draw;
pub mod error;
pub mod invariants;
pub mod models;
pub mod roster;
pub mod session;
pub mod storage;

pub use collaborators::{Clipboard, Collaborators, Confirm, Printer};
pub use draw::{draw, CodeGenerator, DrawEngine};
pub use error::{Error, Result};
pub use models::*;
pub use roster::{Roster, RosterError};
pub use session::{Action, Outcome, Phase, RevealState, SessionController};
pub use storage::{Database, DrawRepository, SessionStore, SESSION_KEY};
