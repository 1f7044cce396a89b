//! System clipboard
//!
//! arboard covers X11, macOS and Windows. Some Wayland compositors refuse it,
//! so under Wayland the `wl-copy` tool is tried as a fallback.

use std::env;
use std::io::Write;
use std::process::{Command, Stdio};

use giftdraw_core::{Clipboard, Error, Result};

/// Detected display server type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayServer {
    Wayland,
    /// X11 session (native or XWayland)
    X11,
    /// Unknown or headless
    Unknown,
}

impl DisplayServer {
    /// Detect the current display server from environment
    pub fn detect() -> Self {
        Self::from_vars(
            env::var_os("WAYLAND_DISPLAY").is_some(),
            env::var_os("DISPLAY").is_some(),
        )
    }

    fn from_vars(wayland: bool, x11: bool) -> Self {
        if wayland {
            DisplayServer::Wayland
        } else if x11 {
            DisplayServer::X11
        } else {
            DisplayServer::Unknown
        }
    }
}

impl std::fmt::Display for DisplayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayServer::Wayland => write!(f, "Wayland"),
            DisplayServer::X11 => write!(f, "X11"),
            DisplayServer::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Clipboard backed by the desktop session
pub struct SystemClipboard {
    display: DisplayServer,
}

impl SystemClipboard {
    pub fn detect() -> Self {
        let server = DisplayServer::detect();
        tracing::info!(display_server = %server, "Display server detected");
        Self { display: server }
    }
}

impl Clipboard for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        let arboard_err = match arboard::Clipboard::new().and_then(|mut c| c.set_text(text)) {
            Ok(()) => {
                tracing::debug!("Copied to clipboard via arboard");
                return Ok(());
            }
            Err(e) => e.to_string(),
        };

        if self.display == DisplayServer::Wayland && try_wl_copy(text) {
            tracing::debug!("Copied to clipboard via wl-copy");
            return Ok(());
        }

        Err(Error::Clipboard(arboard_err))
    }
}

/// Try to copy using wl-copy (Wayland clipboard tool).
fn try_wl_copy(text: &str) -> bool {
    let mut child = match Command::new("wl-copy")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(_) => return false,
    };

    if let Some(mut stdin) = child.stdin.take() {
        if stdin.write_all(text.as_bytes()).is_err() {
            return false;
        }
    }

    matches!(child.wait(), Ok(status) if status.success())
}
