//! Version propagation engine
//!
//! [`VersionPropagator`] expands explicit version requests over a
//! [`crate::graph::ModuleGraph`] into a [`ChangeSet`] covering every module
//! that must be re-versioned.

pub mod change_set;
pub mod propagator;

pub use change_set::{ChangeEntry, ChangeSet};
pub use propagator::{PropagationOptions, SeedOutcome, TriggerPolicy, VersionPropagator};
