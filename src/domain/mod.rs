//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod code_set;
pub mod entities;
pub mod error;
pub mod filter;
pub mod forest;
pub mod normalize;
pub mod reconcile;
pub mod reindex;
pub mod session;

pub use code_set::CodeSet;
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use filter::{filter_forest, search_forest, SearchMatcher};
pub use forest::{
    ancestors_of, build_forest, count_nodes, depth, find, walk, BuiltForest, Forest,
    ForestBuilder, ForestDiagnostics, Node,
};
pub use normalize::{CodeValidator, NormalizationPolicy, DEFAULT_CODE_PATTERN};
pub use reconcile::{reconcile, reconcile_with, reconcile_with_policy, Diff};
pub use reindex::{is_contiguous, reindex, reorder, sorted_by_position};
pub use session::{
    AssignmentSession, BatchStatus, FailureKind, SaveFailure, SaveStep, SessionPhase,
    SessionState,
};
