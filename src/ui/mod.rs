//! User interface module - console reporting.
//!
//! - `formatter` - Report text and coloured status lines

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_change_set, display_error, display_file_updates,
    display_status, display_success, format_change_set, format_file_updates,
};
