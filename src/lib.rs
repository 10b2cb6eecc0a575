//! access-core: the logic shared by the access-management console's screens.
//!
//! - forests built from flat parent-code lists (departments, menus, roles)
//! - search filtering that keeps ancestor chains
//! - assignment reconciliation into `{to_add, to_remove}`
//! - contiguous position reindexing after reorders
//! - an assignment editing session driven against an external data layer

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{
    build_forest, count_nodes, filter_forest, reconcile, reconcile_with, reindex, Diff, Forest,
    Node,
};
