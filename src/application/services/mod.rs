//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (AssignmentGateway, Notifier, etc.)
//! but are themselves concrete structs, not traits.

mod assignment;
mod hierarchy;

pub use assignment::{AssignmentService, SaveReport};
pub use hierarchy::{HierarchyService, HierarchyView};
