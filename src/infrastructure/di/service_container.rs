//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{AssignmentService, HierarchyService};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::EntityKind;
use crate::infrastructure::records::RecordLoader;
use crate::infrastructure::traits::{
    AssignmentGateway, ConsoleNotifier, FileSystem, Notifier, RealFileSystem,
};

/// Container holding shared dependencies and building services from them.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Notification sink
    pub notifier: Arc<dyn Notifier>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(ConsoleNotifier))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            notifier,
        }
    }

    pub fn record_loader(&self) -> RecordLoader {
        RecordLoader::new(Arc::clone(&self.fs))
    }

    pub fn hierarchy_service(&self) -> ApplicationResult<HierarchyService> {
        HierarchyService::new(Arc::clone(&self.settings))
    }

    /// Assignment service for the kind of the assigned codes (e.g. `Role`
    /// for user-role), using that kind's configured policy.
    pub fn assignment_service(
        &self,
        gateway: Arc<dyn AssignmentGateway>,
        assigned: EntityKind,
    ) -> AssignmentService {
        AssignmentService::new(
            gateway,
            Arc::clone(&self.notifier),
            self.settings.policy_for(assigned),
        )
    }
}
