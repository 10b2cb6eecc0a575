//! Hierarchy view service
//!
//! Validates entity codes, builds the forest and applies the search filter.
//! Works the same for departments, menus and roles.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{
    count_nodes, filter_forest, CodeValidator, Forest, ForestBuilder, ForestDiagnostics,
    Record, SearchMatcher,
};

/// Forest ready for display.
#[derive(Debug, Clone)]
pub struct HierarchyView {
    pub roots: Forest<Record>,
    pub diagnostics: ForestDiagnostics,
    /// Codes not matching the configured pattern (only when not strict).
    pub invalid_codes: Vec<String>,
    /// Nodes in the unfiltered forest.
    pub total: usize,
    /// Nodes left after filtering.
    pub shown: usize,
}

/// Service for building hierarchy views.
pub struct HierarchyService {
    settings: Arc<Settings>,
    validator: CodeValidator,
}

impl HierarchyService {
    /// Create a new hierarchy service; fails on an invalid code pattern.
    pub fn new(settings: Arc<Settings>) -> ApplicationResult<Self> {
        let validator =
            CodeValidator::new(&settings.code_pattern).map_err(|e| ApplicationError::Config {
                message: e.to_string(),
            })?;
        Ok(Self {
            settings,
            validator,
        })
    }

    /// Build the forest of `records`, optionally filtered by `search`.
    #[instrument(level = "debug", skip(self, records), fields(records = records.len()))]
    pub fn build(&self, records: &[Record], search: Option<&str>) -> ApplicationResult<HierarchyView> {
        let invalid_codes = self.check_codes(records)?;

        let built = ForestBuilder::new().build_hierarchy(records);
        let total = count_nodes(&built.roots);

        let matcher = SearchMatcher::new(search.unwrap_or_default());
        let roots = if matcher.is_empty() {
            built.roots
        } else {
            filter_forest(&built.roots, |r| matcher.matches_record(r))
        };
        let shown = count_nodes(&roots);
        debug!("build: {} of {} nodes shown", shown, total);

        Ok(HierarchyView {
            roots,
            diagnostics: built.diagnostics,
            invalid_codes,
            total,
            shown,
        })
    }

    fn check_codes(&self, records: &[Record]) -> ApplicationResult<Vec<String>> {
        let invalid: Vec<String> = records
            .iter()
            .filter(|r| !self.validator.is_valid(&r.code))
            .map(|r| r.code.clone())
            .collect();
        if invalid.is_empty() {
            return Ok(invalid);
        }
        if self.settings.strict_codes {
            return Err(ApplicationError::InvalidCodes {
                codes: invalid,
                pattern: self.settings.code_pattern.clone(),
            });
        }
        warn!("{} codes do not match {}", invalid.len(), self.settings.code_pattern);
        Ok(invalid)
    }
}
