use std::path::PathBuf;
use thiserror::Error;

/// Cogwright error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Parser error: {0}")]
    Parser(String),

    #[error("Directive error in {document}: {message}")]
    Directive { document: String, message: String },

    #[error("Cannot resolve class {class}: {message}")]
    Resolution { class: String, message: String },

    #[error("Scaffold error: {0}")]
    Scaffold(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Cogwright operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a parse error
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a parser error
    pub fn parser(msg: impl Into<String>) -> Self {
        Error::Parser(msg.into())
    }

    /// Create an authoring error for a directive in a document
    pub fn directive(document: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Directive {
            document: document.into(),
            message: message.into(),
        }
    }

    /// Create a class resolution error
    pub fn resolution(class: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Resolution {
            class: class.into(),
            message: message.into(),
        }
    }

    /// Create a scaffolding error
    pub fn scaffold(msg: impl Into<String>) -> Self {
        Error::Scaffold(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_path_not_found_display() {
        let err = Error::PathNotFound(PathBuf::from("/some/path"));
        assert_eq!(err.to_string(), "Path not found: /some/path");
    }

    #[test]
    fn test_parse_error_display() {
        let err = Error::parse("/foo/bar.py", "unexpected token");
        assert!(err.to_string().contains("/foo/bar.py"));
        assert!(err.to_string().contains("unexpected token"));
    }

    #[test]
    fn test_directive_error_display() {
        let err = Error::directive("api", "no current module for Client");
        assert_eq!(
            err.to_string(),
            "Directive error in api: no current module for Client"
        );
    }

    #[test]
    fn test_resolution_error_display() {
        let err = Error::resolution("shop.Widget", "module shop not found");
        assert_eq!(
            err.to_string(),
            "Cannot resolve class shop.Widget: module shop not found"
        );
    }

    #[test]
    fn test_scaffold_error_display() {
        let err = Error::scaffold("invalid directory name given, use a different one");
        assert!(err.to_string().starts_with("Scaffold error"));
    }

    #[test]
    fn test_other_error() {
        let err = Error::other("something went wrong");
        assert_eq!(err.to_string(), "something went wrong");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
