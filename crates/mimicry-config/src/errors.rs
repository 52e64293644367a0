use thiserror::Error;

/// Fatal configuration problems, raised before any value is generated.
///
/// Every link variant names the link field and the path it targets.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("circular or chained link: '{field}' targets '{target}', which is itself a link field")]
    ChainedLink { field: String, target: String },
    #[error("downward link: '{field}' targets its own descendant '{target}'")]
    DownwardLink { field: String, target: String },
    #[error("cross-scope link: '{field}' may not target '{target}'")]
    CrossScopeLink { field: String, target: String },
    #[error("missing link target: '{field}' targets '{target}', which is not declared")]
    MissingTarget { field: String, target: String },
    #[error("array scope violation: '{field}' targets '{target}' outside its own item structure")]
    ArrayScope { field: String, target: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigurationError {
    /// Path of the link field that failed validation, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigurationError::ChainedLink { field, .. }
            | ConfigurationError::DownwardLink { field, .. }
            | ConfigurationError::CrossScopeLink { field, .. }
            | ConfigurationError::MissingTarget { field, .. }
            | ConfigurationError::ArrayScope { field, .. } => Some(field),
            ConfigurationError::Json(_) => None,
        }
    }
}
