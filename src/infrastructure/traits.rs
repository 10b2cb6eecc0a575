//! I/O boundary traits for testability
//!
//! These traits abstract the external data layer, the notification sink and
//! file access, allowing services to be tested with mock implementations.

use std::fmt;
use std::io;
use std::path::Path;

use colored::Colorize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{Diff, SaveFailure};

/// Failure reported by the external data layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GatewayError {
    pub message: String,
}

impl GatewayError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Assignment state of one owning entity as held by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentSnapshot {
    /// Codes that may be assigned.
    pub available: Vec<String>,
    /// Codes currently assigned.
    pub current: Vec<String>,
}

/// External data layer for one kind of assignment (e.g. menu-role).
pub trait AssignmentGateway: Send + Sync {
    /// Fetch available and current codes for an owner.
    fn fetch(&self, owner: &str) -> Result<AssignmentSnapshot, GatewayError>;

    /// Grant `codes` to `owner`.
    fn add_many(&self, owner: &str, codes: &[String]) -> Result<(), GatewayError>;

    /// Revoke `codes` from `owner`.
    fn remove_many(&self, owner: &str, codes: &[String]) -> Result<(), GatewayError>;
}

/// Message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Saved { owner: String, diff: Diff },
    SavedUnverified { owner: String, diff: Diff, message: String },
    NoChanges { owner: String },
    SaveFailed { owner: String, failure: SaveFailure },
    LoadFailed { owner: String, message: String },
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Notice::SaveFailed { .. } | Notice::LoadFailed { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Saved { owner, diff } => write!(
                f,
                "{}: saved ({} added, {} removed)",
                owner,
                diff.to_add.len(),
                diff.to_remove.len()
            ),
            Notice::SavedUnverified { owner, diff, message } => write!(
                f,
                "{}: saved ({} added, {} removed) but refresh failed: {}; reload to verify",
                owner,
                diff.to_add.len(),
                diff.to_remove.len(),
                message
            ),
            Notice::NoChanges { owner } => write!(f, "{}: no changes", owner),
            Notice::SaveFailed { owner, failure } => write!(f, "{}: {}", owner, failure),
            Notice::LoadFailed { owner, message } => {
                write!(f, "{}: load failed: {}", owner, message)
            }
        }
    }
}

/// Notification sink for success and error messages.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Prints notices to the terminal.
///
/// Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        match notice {
            Notice::Saved { .. } => println!("{} {}", "✓".green(), notice),
            Notice::SavedUnverified { .. } => eprintln!("{}: {}", "Warning".yellow(), notice),
            Notice::NoChanges { .. } => println!("{} {}", "•".cyan(), notice),
            Notice::SaveFailed { .. } | Notice::LoadFailed { .. } => {
                eprintln!("{}: {}", "error".red().bold(), notice)
            }
        }
    }
}

/// Sends notices to the tracing subscriber.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        if notice.is_error() || matches!(notice, Notice::SavedUnverified { .. }) {
            warn!("{}", notice);
        } else {
            info!("{}", notice);
        }
    }
}
