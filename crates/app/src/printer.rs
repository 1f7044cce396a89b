//! Code sheet printing
//!
//! "Printing" writes the sheet to a plain text file the user can send to any
//! printer. The sheet only ever carries givers and codes.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use giftdraw_core::{Printer, Result};

pub struct FilePrinter {
    dir: PathBuf,
    last_path: Option<PathBuf>,
}

impl FilePrinter {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            last_path: None,
        }
    }

    /// Where the most recent sheet went
    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }
}

impl Printer for FilePrinter {
    fn print(&mut self, sheet: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self
            .dir
            .join(format!("codes-{}.txt", Utc::now().format("%Y%m%d-%H%M%S")));
        fs::write(&path, sheet)?;

        tracing::info!(path = %path.display(), "Code sheet written");
        self.last_path = Some(path);
        Ok(())
    }
}
