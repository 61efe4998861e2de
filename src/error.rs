use thiserror::Error;

/// Unified error type for version-cascade operations
#[derive(Error, Debug)]
pub enum CascadeError {
    #[error("Version format error: {0}")]
    Format(String),

    #[error("Graph integrity error: {0}")]
    GraphIntegrity(String),

    #[error("Dependency cycle detected: {0}")]
    Cycle(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Project file error: {0}")]
    Project(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in version-cascade
pub type Result<T> = std::result::Result<T, CascadeError>;

impl CascadeError {
    /// Create a version format error with context
    pub fn format(msg: impl Into<String>) -> Self {
        CascadeError::Format(msg.into())
    }

    /// Create a graph integrity error with context
    pub fn graph(msg: impl Into<String>) -> Self {
        CascadeError::GraphIntegrity(msg.into())
    }

    /// Create a cycle error with context
    pub fn cycle(msg: impl Into<String>) -> Self {
        CascadeError::Cycle(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        CascadeError::Config(msg.into())
    }

    /// Create a project file error with context
    pub fn project(msg: impl Into<String>) -> Self {
        CascadeError::Project(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CascadeError::config("missing section");
        assert_eq!(err.to_string(), "Configuration error: missing section");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CascadeError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: CascadeError = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (CascadeError::format("x"), "Version format error"),
            (CascadeError::graph("x"), "Graph integrity error"),
            (CascadeError::cycle("x"), "Dependency cycle detected"),
            (CascadeError::config("x"), "Configuration error"),
            (CascadeError::project("x"), "Project file error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
