//! Line-oriented terminal surface
//!
//! One screen per session phase. Each line typed by the user becomes at most
//! one dispatcher action; everything shown comes from the session, so the
//! codes are only on screen during distribution and a recipient only while
//! its giver's code is revealed.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use giftdraw_core::{
    Action, Clipboard, Collaborators, Confirm, DrawRepository, Outcome, Phase, RevealState,
    SessionController,
};

use crate::printer::FilePrinter;
use crate::state::ScreenState;

/// Clear the screen and the scrollback, then home the cursor
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[3J\x1b[H";

/// What a typed line means in the current phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Act(Action),
    Help,
    Quit,
}

/// Interpret one input line for the given phase
pub fn parse(phase: Phase, line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let word = word.to_lowercase();

    match word.as_str() {
        "quit" | "exit" => return Command::Quit,
        "help" | "?" => return Command::Help,
        "reset" => return Command::Act(Action::Reset),
        _ => {}
    }

    match phase {
        Phase::Setup => match word.as_str() {
            "add" => Command::Act(Action::AddParticipant(rest.to_string())),
            "remove" | "rm" => Command::Act(Action::RemoveParticipant(rest.to_string())),
            "draw" => Command::Act(Action::Draw),
            _ => Command::Help,
        },
        Phase::Codes => match word.as_str() {
            "copy" if !rest.is_empty() => Command::Act(Action::CopyCode(rest.to_string())),
            "copy-all" | "copyall" => Command::Act(Action::CopyAllCodes),
            "print" => Command::Act(Action::PrintCodes),
            "continue" | "next" => Command::Act(Action::ContinueToReveal),
            _ => Command::Help,
        },
        // Anything else typed here is a code attempt
        Phase::Reveal(RevealState::AwaitingCode) => Command::Act(Action::Redeem(line.to_string())),
        Phase::Reveal(RevealState::Revealed) => Command::Act(Action::Dismiss),
    }
}

fn help_text(phase: Phase) -> &'static str {
    match phase {
        Phase::Setup => "Commands: add <name>, remove <name>, draw (3 or more people), reset, quit",
        Phase::Codes => "Commands: copy <name>, copy-all, print, continue, reset, quit",
        Phase::Reveal(RevealState::AwaitingCode) => {
            "Type your 6-character code and press Enter. Also: reset, quit"
        }
        Phase::Reveal(RevealState::Revealed) => "Press Enter to hide the result. Also: reset, quit",
    }
}

/// Input and output streams, also used to answer confirmation prompts
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Next line without its terminator, or None at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    #[cfg(test)]
    pub fn output(&self) -> &W {
        &self.output
    }
}

impl<R: BufRead, W: Write> Confirm for Console<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if write!(self.output, "{prompt} [y/N] ").and_then(|_| self.output.flush()).is_err() {
            return false;
        }
        match self.read_line() {
            Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            _ => false,
        }
    }
}

pub struct Terminal<R, W> {
    console: Console<R, W>,
    screen: ScreenState,
    clipboard: Box<dyn Clipboard>,
    printer: FilePrinter,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    pub fn new(
        console: Console<R, W>,
        clipboard: Box<dyn Clipboard>,
        printer: FilePrinter,
        copied_ttl: Duration,
    ) -> Self {
        Self {
            console,
            screen: ScreenState::new(copied_ttl),
            clipboard,
            printer,
        }
    }

    #[cfg(test)]
    pub fn console(&self) -> &Console<R, W> {
        &self.console
    }

    /// Drive the session until the user quits or input ends
    pub fn run<S: DrawRepository>(&mut self, session: &mut SessionController<S>) -> io::Result<()> {
        loop {
            self.render(session)?;

            let Some(line) = self.console.read_line()? else {
                break;
            };

            match parse(session.phase(), &line) {
                Command::Quit => break,
                Command::Help => self.screen.set_notice(help_text(session.phase())),
                Command::Act(action) => self.apply(session, action)?,
            }
        }

        writeln!(self.console.output)?;
        Ok(())
    }

    fn apply<S: DrawRepository>(
        &mut self,
        session: &mut SessionController<S>,
        action: Action,
    ) -> io::Result<()> {
        let result = {
            let mut collab = Collaborators {
                clipboard: self.clipboard.as_mut(),
                printer: &mut self.printer,
                confirm: &mut self.console,
            };
            session.dispatch(action, &mut collab)
        };

        match result {
            Ok(outcome) => self.on_outcome(outcome)?,
            Err(e) => self.screen.set_notice(e.to_string()),
        }
        Ok(())
    }

    fn on_outcome(&mut self, outcome: Outcome) -> io::Result<()> {
        match outcome {
            Outcome::Unchanged
            | Outcome::RosterChanged
            | Outcome::Revealed(_)
            | Outcome::ResetCancelled => {}
            Outcome::Drawn { participants } => self.screen.set_notice(format!(
                "Draw complete for {participants} people. Give each person their code; \
                 later everyone enters their own code alone."
            )),
            Outcome::CodeCopied { code } => self.screen.mark_copied(code, Instant::now()),
            Outcome::AllCodesCopied => self.screen.set_notice("All codes copied."),
            Outcome::Printed => {
                if let Some(path) = self.printer.last_path() {
                    self.screen
                        .set_notice(format!("Code sheet written to {}", path.display()));
                }
            }
            Outcome::PhaseChanged(_) => {
                // Wipe codes or the last result before the next person looks
                self.screen.clear_copied();
                write!(self.console.output, "{CLEAR_SCREEN}")?;
            }
            Outcome::ResetDone => {
                self.screen.clear_copied();
                self.screen.set_notice("Started over. Add participants for a new draw.");
            }
        }
        Ok(())
    }

    fn render<S: DrawRepository>(&mut self, session: &SessionController<S>) -> io::Result<()> {
        let out = &mut self.console.output;
        writeln!(out)?;
        if let Some(notice) = self.screen.take_notice() {
            writeln!(out, "! {notice}")?;
        }

        match session.phase() {
            Phase::Setup => {
                let participants = session.participants();
                writeln!(out, "== Participants ({}) ==", participants.len())?;
                if participants.is_empty() {
                    writeln!(out, "  No participants added yet")?;
                }
                for (i, p) in participants.iter().enumerate() {
                    writeln!(out, "  {}. {}", i + 1, p.name)?;
                }
                write!(out, "setup> ")?;
            }
            Phase::Codes => {
                writeln!(out, "== Codes ==")?;
                let now = Instant::now();
                if let Ok(codes) = session.codes() {
                    let width = codes.iter().map(|e| e.giver.chars().count()).max().unwrap_or(0);
                    for entry in codes {
                        let mark = if self.screen.is_copied(entry.code, now) {
                            "  (copied)"
                        } else {
                            ""
                        };
                        writeln!(out, "  {:<width$}  {}{mark}", entry.giver, entry.code)?;
                    }
                }
                writeln!(out, "Each person should keep their code private.")?;
                write!(out, "codes> ")?;
            }
            Phase::Reveal(RevealState::AwaitingCode) => {
                writeln!(out, "== Reveal ==")?;
                writeln!(out, "Enter your code to see who you drew. Do this alone.")?;
                write!(out, "code> ")?;
            }
            Phase::Reveal(RevealState::Revealed) => {
                if let Some(revealed) = session.revealed() {
                    writeln!(out, "== {}, you drew ==", revealed.giver)?;
                    writeln!(out, "  {}", revealed.receiver)?;
                    writeln!(out, "Don't tell anyone!")?;
                }
                write!(out, "Press Enter to hide> ")?;
            }
        }

        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use giftdraw_core::{Database, Error, Result};
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct SharedClipboard(Arc<Mutex<Vec<String>>>);

    impl Clipboard for SharedClipboard {
        fn copy(&mut self, text: &str) -> Result<()> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn copy(&mut self, _text: &str) -> Result<()> {
            Err(Error::Clipboard("no display".to_string()))
        }
    }

    fn run_script(
        session: &mut SessionController<Database>,
        clipboard: Box<dyn Clipboard>,
        dir: &TempDir,
        script: &str,
    ) -> String {
        let console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        let mut terminal = Terminal::new(
            console,
            clipboard,
            FilePrinter::new(dir.path().to_path_buf()),
            Duration::from_secs(2),
        );
        terminal.run(session).unwrap();
        String::from_utf8(terminal.console().output().clone()).unwrap()
    }

    fn new_session() -> SessionController<Database> {
        SessionController::start(Database::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn test_parse_setup() {
        assert_eq!(
            parse(Phase::Setup, "add  Mary Jane "),
            Command::Act(Action::AddParticipant("Mary Jane".to_string()))
        );
        assert_eq!(
            parse(Phase::Setup, "REMOVE Bob"),
            Command::Act(Action::RemoveParticipant("Bob".to_string()))
        );
        assert_eq!(parse(Phase::Setup, "draw"), Command::Act(Action::Draw));
        assert_eq!(parse(Phase::Setup, "dance"), Command::Help);
        assert_eq!(parse(Phase::Setup, "quit"), Command::Quit);
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!(
            parse(Phase::Codes, "copy Alice"),
            Command::Act(Action::CopyCode("Alice".to_string()))
        );
        assert_eq!(parse(Phase::Codes, "copy"), Command::Help);
        assert_eq!(parse(Phase::Codes, "copy-all"), Command::Act(Action::CopyAllCodes));
        assert_eq!(parse(Phase::Codes, "print"), Command::Act(Action::PrintCodes));
        assert_eq!(
            parse(Phase::Codes, "continue"),
            Command::Act(Action::ContinueToReveal)
        );
        assert_eq!(parse(Phase::Codes, "reset"), Command::Act(Action::Reset));
    }

    #[test]
    fn test_parse_reveal() {
        let awaiting = Phase::Reveal(RevealState::AwaitingCode);
        assert_eq!(
            parse(awaiting, " k7qx2m "),
            Command::Act(Action::Redeem("k7qx2m".to_string()))
        );
        assert_eq!(parse(awaiting, "reset"), Command::Act(Action::Reset));
        assert_eq!(parse(awaiting, "quit"), Command::Quit);

        let revealed = Phase::Reveal(RevealState::Revealed);
        assert_eq!(parse(revealed, ""), Command::Act(Action::Dismiss));
        assert_eq!(parse(revealed, "back"), Command::Act(Action::Dismiss));
    }

    #[test]
    fn test_setup_to_codes_script() {
        let dir = TempDir::new().unwrap();
        let clipboard = SharedClipboard::default();
        let mut session = new_session();

        let output = run_script(
            &mut session,
            Box::new(clipboard.clone()),
            &dir,
            "add Alice\nadd Bob\nadd alice\ndraw\nadd Carol\ndraw\ncopy Alice\ncopy-all\nprint\n",
        );

        assert!(output.contains("At least 3 participants are required, found 2"));
        assert!(output.contains("== Participants (3) =="));
        assert!(output.contains("Draw complete for 3 people"));
        assert!(output.contains("(copied)"));
        assert!(output.contains("Code sheet written to"));
        assert_eq!(session.phase(), Phase::Codes);

        let copied = clipboard.0.lock().unwrap();
        assert_eq!(copied.len(), 2);
        assert_eq!(copied[0].len(), 6);
        assert_eq!(copied[1].lines().count(), 3);

        // The codes screen never shows who drew whom
        let stored = session.store().load_draw().unwrap().unwrap();
        for a in stored.assignments() {
            assert!(output.contains(&a.code));
        }
        assert!(!output.contains("you drew"));
    }

    #[test]
    fn test_reveal_script() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session();
        run_script(
            &mut session,
            Box::new(SharedClipboard::default()),
            &dir,
            "add Alice\nadd Bob\nadd Carol\ndraw\ncontinue\n",
        );
        assert_eq!(session.phase(), Phase::Reveal(RevealState::AwaitingCode));

        let stored = session.store().load_draw().unwrap().unwrap();
        let bob = stored
            .assignments()
            .iter()
            .find(|a| a.giver == "Bob")
            .unwrap()
            .clone();

        let script = format!("ZZZZZZ\n{}\n\n", bob.code.to_lowercase());
        let output = run_script(
            &mut session,
            Box::new(SharedClipboard::default()),
            &dir,
            &script,
        );

        assert!(output.contains("Invalid code"));
        assert!(output.contains(&format!("== Bob, you drew ==\n  {}\n", bob.receiver)));
        assert!(!output.contains("== Alice, you drew =="));
        assert_eq!(session.phase(), Phase::Reveal(RevealState::AwaitingCode));
    }

    #[test]
    fn test_reset_needs_yes() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session();
        run_script(
            &mut session,
            Box::new(SharedClipboard::default()),
            &dir,
            "add Alice\nadd Bob\nadd Carol\ndraw\nreset\nno\n",
        );
        assert_eq!(session.phase(), Phase::Codes);

        let output = run_script(
            &mut session,
            Box::new(SharedClipboard::default()),
            &dir,
            "reset\ny\n",
        );
        assert!(output.contains("[y/N]"));
        assert!(output.contains("Started over."));
        assert_eq!(session.phase(), Phase::Setup);
        assert!(session.store().load_draw().unwrap().is_none());
    }

    #[test]
    fn test_phase_change_clears_scrollback() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session();
        let output = run_script(
            &mut session,
            Box::new(SharedClipboard::default()),
            &dir,
            "add Alice\nadd Bob\nadd Carol\ndraw\ncontinue\n",
        );

        let stored = session.store().load_draw().unwrap().unwrap();
        let (before, after) = output.split_once(CLEAR_SCREEN).unwrap();
        assert!(before.contains(&stored.assignments()[0].code));
        assert!(after.contains("== Reveal =="));
        assert!(CLEAR_SCREEN.contains("\x1b[3J"));
        for a in stored.assignments() {
            assert!(!after.contains(&a.code));
        }
    }

    #[test]
    fn test_clipboard_failure_shown() {
        let dir = TempDir::new().unwrap();
        let mut session = new_session();
        let output = run_script(
            &mut session,
            Box::new(BrokenClipboard),
            &dir,
            "add Alice\nadd Bob\nadd Carol\ndraw\ncopy-all\n",
        );
        assert!(output.contains("Clipboard error: no display"));
        assert!(!output.contains("All codes copied."));
    }
}
