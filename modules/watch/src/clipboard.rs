// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Receives the report text when the user copies it.
///
/// Copying is fire-and-forget: failures are logged by the implementation
/// and never reach the caller.
pub trait Clipboard {
    fn copy(&mut self, text: &str);
}

/// A [`Clipboard`] that writes the copied text into a file.
///
/// If the file can't be written the text is printed on standard output
/// instead, the outcome of that fallback is logged.
#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: &Path) -> Self {
        FileClipboard {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, text: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, text)
    }

    fn fallback_copy(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        let result = stdout
            .write_all(text.as_bytes())
            .and_then(|_| stdout.flush());
        match result {
            Ok(()) => info!("Fallback: Copying text command was successful"),
            Err(e) => error!("Fallback: Oops, unable to copy. Error: {}", e),
        }
    }
}

impl Clipboard for FileClipboard {
    fn copy(&mut self, text: &str) {
        match self.write_file(text) {
            Ok(()) => info!("Copied report to {}", self.path.display()),
            Err(e) => {
                error!(
                    "Failed to copy report to {}. Error: {}",
                    self.path.display(),
                    e
                );
                self.fallback_copy(text);
            }
        }
    }
}
