//! # Print Target & Deferred Print
//!
//! A document is painted first, then printed once after a settling delay.
//!
//! ## Print Timeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  load ──► fetch ──► compose ──► paint(html) ──┐                        │
//! │                                                │                        │
//! │                                PrintTask::schedule(target, 500ms)      │
//! │                                                │                        │
//! │                      ┌─────────────────────────┴──────────────────┐    │
//! │                      ▼                                            ▼    │
//! │             delay elapses                          reload / drop      │
//! │             target.print()  (once)                 abort, no print    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The deadline is fixed when the task is scheduled, so the print never
//! fires earlier than `delay` after the paint that preceded it.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

// =============================================================================
// Print Error
// =============================================================================

/// Errors from painting or printing a document.
#[derive(Debug, Error)]
pub enum PrintError {
    /// The painted page could not be written to the spool directory.
    #[error("Could not write {path}: {source}")]
    Spool {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured print command could not run or exited with failure.
    #[error("Print command '{program}' failed: {reason}")]
    Command { program: String, reason: String },

    /// `print()` was called before anything was painted.
    #[error("Nothing painted to print")]
    NothingPainted,

    /// The scheduled print was cancelled before it fired.
    #[error("Print cancelled")]
    Cancelled,

    /// The print task died.
    #[error("Print failed: {0}")]
    Failed(String),
}

pub type PrintResult<T> = Result<T, PrintError>;

// =============================================================================
// Print Target Trait
// =============================================================================

/// Where documents are painted and printed.
///
/// `paint` replaces whatever was painted before. `print` takes no arguments:
/// it prints the current paint.
pub trait PrintTarget: Send + Sync + 'static {
    /// Renders `html` as the current page.
    fn paint(&self, html: &str) -> PrintResult<()>;

    /// Prints the current page.
    fn print(&self) -> impl Future<Output = PrintResult<()>> + Send;
}

// =============================================================================
// Print Task
// =============================================================================

/// A print scheduled after a settling delay.
///
/// Dropping the task cancels it, so a view that goes away before the delay
/// elapses never prints.
#[derive(Debug)]
pub struct PrintTask {
    handle: Option<JoinHandle<PrintResult<()>>>,
}

impl PrintTask {
    /// Schedules `target.print()` to run once, `delay` from now.
    pub fn schedule<P: PrintTarget>(target: Arc<P>, delay: Duration) -> Self {
        let deadline = Instant::now() + delay;
        debug!(delay_ms = delay.as_millis() as u64, "Print scheduled");

        let handle = tokio::spawn(async move {
            sleep_until(deadline).await;
            info!("Printing document");
            target.print().await
        });

        PrintTask {
            handle: Some(handle),
        }
    }

    /// Cancels the print if it has not fired yet.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                debug!("Print cancelled");
            }
            handle.abort();
        }
    }

    /// True once the print ran (or the task was cancelled).
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Waits for the print to complete.
    pub async fn wait(mut self) -> PrintResult<()> {
        let Some(handle) = self.handle.take() else {
            return Err(PrintError::Cancelled);
        };

        match handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(PrintError::Cancelled),
            Err(e) => Err(PrintError::Failed(e.to_string())),
        }
    }
}

impl Drop for PrintTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

// =============================================================================
// Spool Printer
// =============================================================================

/// Paints into an HTML file in the spool directory and optionally hands the
/// file to a print command (`lp`, a browser, ...).
#[derive(Debug, Clone)]
pub struct SpoolPrinter {
    path: PathBuf,
    command: Option<Vec<String>>,
}

impl SpoolPrinter {
    /// Creates a printer that paints into `output_dir/file_name`.
    ///
    /// `command` is an argv; the spooled file path is appended as the last
    /// argument.
    pub fn new(
        output_dir: impl AsRef<Path>,
        file_name: &str,
        command: Option<Vec<String>>,
    ) -> Self {
        SpoolPrinter {
            path: output_dir.as_ref().join(file_name),
            command: command.filter(|argv| !argv.is_empty()),
        }
    }

    /// The file the page is painted into.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn spool_error(&self, source: std::io::Error) -> PrintError {
        PrintError::Spool {
            path: self.path.clone(),
            source,
        }
    }
}

impl PrintTarget for SpoolPrinter {
    fn paint(&self, html: &str) -> PrintResult<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| self.spool_error(e))?;
        }
        std::fs::write(&self.path, html).map_err(|e| self.spool_error(e))?;
        debug!(path = %self.path.display(), bytes = html.len(), "Painted");
        Ok(())
    }

    async fn print(&self) -> PrintResult<()> {
        if !tokio::fs::try_exists(&self.path)
            .await
            .map_err(|e| self.spool_error(e))?
        {
            return Err(PrintError::NothingPainted);
        }

        let Some((program, args)) = self.command.as_deref().and_then(|argv| argv.split_first())
        else {
            info!(path = %self.path.display(), "Document spooled");
            return Ok(());
        };

        let status = Command::new(program)
            .args(args)
            .arg(&self.path)
            .status()
            .await
            .map_err(|e| PrintError::Command {
                program: program.clone(),
                reason: e.to_string(),
            })?;

        if !status.success() {
            warn!(program = %program, %status, "Print command failed");
            return Err(PrintError::Command {
                program: program.clone(),
                reason: status.to_string(),
            });
        }

        info!(path = %self.path.display(), program = %program, "Document sent to printer");
        Ok(())
    }
}

// =============================================================================
// Recording Target (tests)
// =============================================================================

#[cfg(test)]
pub(crate) use recording::RecordingPrinter;
