//! Assignment editing service
//!
//! Drives an [`AssignmentSession`] against the external data layer: loading,
//! saving both mutation batches concurrently, and reporting the outcome.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, GatewayResultExt};
use crate::domain::{
    AssignmentSession, BatchStatus, Diff, NormalizationPolicy, SaveFailure, SaveStep,
};
use crate::infrastructure::traits::{AssignmentGateway, GatewayError, Notice, Notifier};

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveReport {
    /// Nothing differed; no mutation was sent.
    NoChanges,
    /// Both batches were applied.
    Saved(Diff),
    /// Both batches were accepted but the refresh failed; the session holds
    /// locally derived state and needs a reload.
    SavedUnverified(Diff),
}

/// Service for one kind of assignment (menu-role, department-application, ...).
pub struct AssignmentService {
    gateway: Arc<dyn AssignmentGateway>,
    notifier: Arc<dyn Notifier>,
    policy: NormalizationPolicy,
}

impl AssignmentService {
    /// Create a new assignment service.
    pub fn new(
        gateway: Arc<dyn AssignmentGateway>,
        notifier: Arc<dyn Notifier>,
        policy: NormalizationPolicy,
    ) -> Self {
        Self {
            gateway,
            notifier,
            policy,
        }
    }

    pub fn policy(&self) -> NormalizationPolicy {
        self.policy
    }

    /// Create a session for `owner` and load it.
    pub fn open(&self, owner: &str) -> ApplicationResult<AssignmentSession> {
        let mut session = AssignmentSession::new(owner, self.policy);
        self.load(&mut session)?;
        Ok(session)
    }

    /// Fetch available and current codes into the session.
    #[instrument(level = "debug", skip(self, session), fields(owner = session.owner()))]
    pub fn load(&self, session: &mut AssignmentSession) -> ApplicationResult<()> {
        session.begin_load()?;
        let owner = session.owner().to_string();
        match self.gateway.fetch(&owner) {
            Ok(snapshot) => {
                session.loaded(&snapshot.available, &snapshot.current)?;
                Ok(())
            }
            Err(e) => {
                session.load_failed()?;
                self.notifier.notify(&Notice::LoadFailed {
                    owner: owner.clone(),
                    message: e.to_string(),
                });
                Err(e).with_owner_context("fetch assignments", &owner)
            }
        }
    }

    /// Save the session's edits.
    ///
    /// On failure the session keeps the edits and the error carries both
    /// batch outcomes.
    #[instrument(level = "debug", skip(self, session), fields(owner = session.owner()))]
    pub fn save(&self, session: &mut AssignmentSession) -> ApplicationResult<SaveReport> {
        let step = session.begin_save()?;
        self.dispatch(session, step)
    }

    /// Resend whatever a failed save left unapplied.
    #[instrument(level = "debug", skip(self, session), fields(owner = session.owner()))]
    pub fn retry(&self, session: &mut AssignmentSession) -> ApplicationResult<SaveReport> {
        let step = session.retry()?;
        self.dispatch(session, step)
    }

    fn dispatch(
        &self,
        session: &mut AssignmentSession,
        step: SaveStep,
    ) -> ApplicationResult<SaveReport> {
        let owner = session.owner().to_string();
        let diff = match step {
            SaveStep::NoChanges => {
                self.notifier.notify(&Notice::NoChanges { owner });
                return Ok(SaveReport::NoChanges);
            }
            SaveStep::Dispatch(diff) => diff,
        };

        // Batches touch disjoint codes, so they can run side by side.
        let (add, remove) = rayon::join(
            || run_batch(&diff.to_add, |codes| self.gateway.add_many(&owner, codes)),
            || run_batch(&diff.to_remove, |codes| self.gateway.remove_many(&owner, codes)),
        );
        debug!("dispatch: add {}, remove {}", add, remove);

        if add.is_failed() || remove.is_failed() {
            let failure = SaveFailure { add, remove };
            session.fail(failure.clone())?;
            self.notifier.notify(&Notice::SaveFailed {
                owner: owner.clone(),
                failure: failure.clone(),
            });
            return Err(ApplicationError::Save { owner, failure });
        }

        match self.gateway.fetch(&owner) {
            Ok(snapshot) => session.settle(&snapshot.available, &snapshot.current)?,
            Err(e) => {
                warn!("refresh after save failed for {}: {}", owner, e);
                session.settle_unverified()?;
                self.notifier.notify(&Notice::SavedUnverified {
                    owner,
                    diff: diff.clone(),
                    message: e.to_string(),
                });
                return Ok(SaveReport::SavedUnverified(diff));
            }
        }

        self.notifier.notify(&Notice::Saved {
            owner,
            diff: diff.clone(),
        });
        Ok(SaveReport::Saved(diff))
    }
}

fn run_batch<F>(codes: &[String], send: F) -> BatchStatus
where
    F: FnOnce(&[String]) -> Result<(), GatewayError>,
{
    if codes.is_empty() {
        return BatchStatus::Skipped;
    }
    match send(codes) {
        Ok(()) => BatchStatus::Succeeded,
        Err(e) => BatchStatus::Failed(e.message),
    }
}
