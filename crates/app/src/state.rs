//! Ephemeral screen state
//!
//! Nothing here is persisted. Losing it (or a late expiry) only changes
//! what the screen shows, never the session.

use std::time::{Duration, Instant};

/// Mark shown next to a code right after it was copied
#[derive(Debug, Clone)]
pub struct CopiedIndicator {
    code: String,
    since: Instant,
}

/// Transient fields of the terminal surface
#[derive(Debug)]
pub struct ScreenState {
    copied: Option<CopiedIndicator>,
    copied_ttl: Duration,
    /// One-shot message shown above the next screen
    notice: Option<String>,
}

impl ScreenState {
    pub fn new(copied_ttl: Duration) -> Self {
        Self {
            copied: None,
            copied_ttl,
            notice: None,
        }
    }

    pub fn mark_copied(&mut self, code: String, now: Instant) {
        self.copied = Some(CopiedIndicator { code, since: now });
    }

    /// Whether the copied mark should still be shown next to `code`
    pub fn is_copied(&mut self, code: &str, now: Instant) -> bool {
        let expired = self
            .copied
            .as_ref()
            .is_some_and(|c| now.saturating_duration_since(c.since) >= self.copied_ttl);
        if expired {
            self.copied = None;
        }

        self.copied.as_ref().is_some_and(|c| c.code == code)
    }

    pub fn clear_copied(&mut self) {
        self.copied = None;
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}
