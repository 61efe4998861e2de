pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod graph;
pub mod project;
pub mod propagation;
pub mod ui;

pub use error::{CascadeError, Result};
