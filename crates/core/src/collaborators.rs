//! External collaborators the session talks to
//!
//! The session never touches a clipboard, printer or prompt directly. The
//! interactive surface supplies implementations of these traits.

use crate::error::Result;

/// Copies text somewhere the user can paste it from
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// Renders the code sheet to a printable surface
pub trait Printer {
    fn print(&mut self, sheet: &str) -> Result<()>;
}

/// Blocking yes/no question. `false` aborts the triggering action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// The collaborators one dispatch call may use
pub struct Collaborators<'a> {
    pub clipboard: &'a mut dyn Clipboard,
    pub printer: &'a mut dyn Printer,
    pub confirm: &'a mut dyn Confirm,
}
