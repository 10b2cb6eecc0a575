//! Assignment editing session.
//!
//! One session backs one assignment screen for one owning entity (a menu, a
//! department, a user). It moves through
//!
//! ```text
//! Idle -> Loading -> Ready -> Dirty -> Saving -> Settled
//!                                            \-> Failed -> Dirty | Saving
//! ```
//!
//! A save whose refresh fetch failed still settles, but flags the session
//! with [`AssignmentSession::needs_reload`].
//!
//! The session is a plain value: transitions are methods returning
//! [`DomainResult`], and all I/O happens outside (see
//! `application::services::AssignmentService`).

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::code_set::CodeSet;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::normalize::NormalizationPolicy;
use crate::domain::reconcile::{reconcile_with_policy, Diff};

/// Coarse state of a session, used in error messages and checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Idle,
    Loading,
    Ready,
    Dirty,
    Saving,
    Settled,
    Failed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Loading => "loading",
            SessionPhase::Ready => "ready",
            SessionPhase::Dirty => "dirty",
            SessionPhase::Saving => "saving",
            SessionPhase::Settled => "settled",
            SessionPhase::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Outcome of one mutation batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    /// Nothing to send.
    Skipped,
    Succeeded,
    Failed(String),
}

impl BatchStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, BatchStatus::Failed(_))
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, BatchStatus::Succeeded)
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Skipped => f.write_str("skipped"),
            BatchStatus::Succeeded => f.write_str("succeeded"),
            BatchStatus::Failed(reason) => write!(f, "failed ({reason})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// One batch was applied, the other was not.
    Partial,
    /// Nothing was applied.
    Total,
}

/// Both sub-results of a failed save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveFailure {
    pub add: BatchStatus,
    pub remove: BatchStatus,
}

impl SaveFailure {
    pub fn kind(&self) -> FailureKind {
        if self.add.is_succeeded() || self.remove.is_succeeded() {
            FailureKind::Partial
        } else {
            FailureKind::Total
        }
    }
}

impl fmt::Display for SaveFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind() {
            FailureKind::Partial => "partial",
            FailureKind::Total => "total",
        };
        write!(f, "{} failure: add {}, remove {}", kind, self.add, self.remove)
    }
}

/// Full session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Loading,
    Ready,
    Dirty,
    Saving { diff: Diff },
    Settled,
    Failed { failure: SaveFailure },
}

impl SessionState {
    pub fn phase(&self) -> SessionPhase {
        match self {
            SessionState::Idle => SessionPhase::Idle,
            SessionState::Loading => SessionPhase::Loading,
            SessionState::Ready => SessionPhase::Ready,
            SessionState::Dirty => SessionPhase::Dirty,
            SessionState::Saving { .. } => SessionPhase::Saving,
            SessionState::Settled => SessionPhase::Settled,
            SessionState::Failed { .. } => SessionPhase::Failed,
        }
    }
}

/// What the caller has to do after [`AssignmentSession::begin_save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStep {
    /// Desired equals current; the session is already settled.
    NoChanges,
    /// Send both batches, then report back via `settle` or `fail`.
    Dispatch(Diff),
}

const EDITABLE: &[SessionPhase] = &[
    SessionPhase::Ready,
    SessionPhase::Dirty,
    SessionPhase::Failed,
    SessionPhase::Settled,
];

// Settled stays saveable so a repeated save reports no changes.
const SAVEABLE: &[SessionPhase] = &[
    SessionPhase::Ready,
    SessionPhase::Dirty,
    SessionPhase::Failed,
    SessionPhase::Settled,
];

// Dirty and Failed hold unsaved edits and must not be reloaded over.
const LOADABLE: &[SessionPhase] = &[
    SessionPhase::Idle,
    SessionPhase::Ready,
    SessionPhase::Settled,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSession {
    owner: String,
    state: SessionState,
    available: CodeSet,
    current: CodeSet,
    desired: CodeSet,
    /// `current` was derived locally rather than fetched.
    #[serde(default)]
    needs_reload: bool,
}

impl AssignmentSession {
    pub fn new(owner: impl Into<String>, policy: NormalizationPolicy) -> Self {
        Self {
            owner: owner.into(),
            state: SessionState::Idle,
            available: CodeSet::new(policy),
            current: CodeSet::new(policy),
            desired: CodeSet::new(policy),
            needs_reload: false,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn policy(&self) -> NormalizationPolicy {
        self.current.policy()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn available(&self) -> &CodeSet {
        &self.available
    }

    pub fn current(&self) -> &CodeSet {
        &self.current
    }

    pub fn desired(&self) -> &CodeSet {
        &self.desired
    }

    /// True after [`settle_unverified`](Self::settle_unverified) until the
    /// next successful load or settle.
    pub fn needs_reload(&self) -> bool {
        self.needs_reload
    }

    pub fn is_selected(&self, code: &str) -> bool {
        self.desired.contains(code)
    }

    /// Assigned but no longer available: shown as-is, never toggled or revoked.
    pub fn is_locked(&self, code: &str) -> bool {
        self.current.contains(code) && !self.available.contains(code)
    }

    pub fn locked(&self) -> CodeSet {
        self.current.difference(&self.available)
    }

    /// Delta a save would send right now.
    pub fn pending_diff(&self) -> Diff {
        let desired = self.desired.union(&self.locked());
        reconcile_with_policy(desired.iter(), self.current.iter(), self.policy())
    }

    fn expect_phase(&self, allowed: &[SessionPhase], action: &'static str) -> DomainResult<()> {
        let from = self.phase();
        if allowed.contains(&from) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition { from, action })
        }
    }

    pub fn begin_load(&mut self) -> DomainResult<()> {
        self.expect_phase(LOADABLE, "load")?;
        self.state = SessionState::Loading;
        Ok(())
    }

    /// Fetch succeeded: `desired` starts as `current ∩ available`.
    pub fn loaded<A, AS, C, CS>(&mut self, available: A, current: C) -> DomainResult<()>
    where
        A: IntoIterator<Item = AS>,
        AS: AsRef<str>,
        C: IntoIterator<Item = CS>,
        CS: AsRef<str>,
    {
        self.expect_phase(&[SessionPhase::Loading], "finish loading")?;
        self.replace_sets(available, current);
        self.state = SessionState::Ready;
        debug!(
            "session {} ready: {} available, {} current, {} locked",
            self.owner,
            self.available.len(),
            self.current.len(),
            self.locked().len()
        );
        Ok(())
    }

    pub fn load_failed(&mut self) -> DomainResult<()> {
        self.expect_phase(&[SessionPhase::Loading], "fail loading")?;
        self.state = SessionState::Idle;
        Ok(())
    }

    /// Flip one code in the desired set; returns whether it is now selected.
    pub fn toggle(&mut self, code: &str) -> DomainResult<bool> {
        self.expect_phase(EDITABLE, "edit")?;
        let canonical = self
            .available
            .get(code)
            .ok_or_else(|| DomainError::CodeNotAvailable(code.to_string()))?
            .to_string();
        let selected = self.desired.toggle(&canonical);
        self.state = SessionState::Dirty;
        Ok(selected)
    }

    pub fn select_all(&mut self) -> DomainResult<()> {
        self.expect_phase(EDITABLE, "edit")?;
        self.desired = self.desired.union(&self.available);
        self.state = SessionState::Dirty;
        Ok(())
    }

    pub fn clear_selection(&mut self) -> DomainResult<()> {
        self.expect_phase(EDITABLE, "edit")?;
        self.desired = CodeSet::new(self.policy());
        self.state = SessionState::Dirty;
        Ok(())
    }

    /// Compute the diff and either settle immediately or enter `Saving`.
    pub fn begin_save(&mut self) -> DomainResult<SaveStep> {
        self.expect_phase(SAVEABLE, "save")?;
        let diff = self.pending_diff();
        if diff.is_empty() {
            debug!("session {}: no changes", self.owner);
            self.state = SessionState::Settled;
            return Ok(SaveStep::NoChanges);
        }
        debug!(
            "session {}: saving +{} -{}",
            self.owner,
            diff.to_add.len(),
            diff.to_remove.len()
        );
        self.state = SessionState::Saving { diff: diff.clone() };
        Ok(SaveStep::Dispatch(diff))
    }

    /// Explicit retry after a failed save.
    pub fn retry(&mut self) -> DomainResult<SaveStep> {
        self.expect_phase(&[SessionPhase::Failed], "retry")?;
        self.begin_save()
    }

    /// Both batches succeeded; adopt the backend's refreshed state.
    pub fn settle<A, AS, C, CS>(&mut self, available: A, current: C) -> DomainResult<()>
    where
        A: IntoIterator<Item = AS>,
        AS: AsRef<str>,
        C: IntoIterator<Item = CS>,
        CS: AsRef<str>,
    {
        self.expect_phase(&[SessionPhase::Saving], "settle")?;
        self.replace_sets(available, current);
        self.state = SessionState::Settled;
        Ok(())
    }

    /// Both batches succeeded but the refresh did not. Settles on `diff`
    /// applied locally and flags the session for reload.
    pub fn settle_unverified(&mut self) -> DomainResult<Diff> {
        let diff = match &self.state {
            SessionState::Saving { diff } => diff.clone(),
            other => {
                return Err(DomainError::InvalidTransition {
                    from: other.phase(),
                    action: "settle",
                })
            }
        };
        let policy = self.policy();
        let current = diff.apply_to(self.current.iter(), |s| policy.normalize(s));
        let available = self.available.to_vec();
        self.replace_sets(&available, &current);
        self.needs_reload = true;
        self.state = SessionState::Settled;
        Ok(diff)
    }

    /// At least one batch failed. Edits are kept; whatever was applied is
    /// folded into `current` so a retry only resends the rest.
    pub fn fail(&mut self, failure: SaveFailure) -> DomainResult<()> {
        let diff = match &self.state {
            SessionState::Saving { diff } => diff.clone(),
            other => {
                return Err(DomainError::InvalidTransition {
                    from: other.phase(),
                    action: "record failure",
                })
            }
        };
        if failure.add.is_succeeded() {
            for code in &diff.to_add {
                self.current.insert(code);
            }
        }
        if failure.remove.is_succeeded() {
            for code in &diff.to_remove {
                self.current.remove(code);
            }
        }
        debug!("session {}: {}", self.owner, failure);
        self.state = SessionState::Failed { failure };
        Ok(())
    }

    fn replace_sets<A, AS, C, CS>(&mut self, available: A, current: C)
    where
        A: IntoIterator<Item = AS>,
        AS: AsRef<str>,
        C: IntoIterator<Item = CS>,
        CS: AsRef<str>,
    {
        let policy = self.policy();
        self.needs_reload = false;
        self.available = CodeSet::from_codes(policy, available);
        self.current = CodeSet::from_codes(policy, current);
        self.desired = self.current.intersection(&self.available);
    }
}
