#[derive(Debug, Clone, PartialEq)]
pub enum TreeError {
    /// A value outside its allowed range. `level` is set for per-level fields.
    InvalidParameter {
        field: &'static str,
        level: Option<usize>,
        reason: &'static str,
    },
    /// A per-level table has no entry for a level the tree will reach.
    MissingLevel { field: &'static str, level: usize },
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::InvalidParameter {
                field,
                level: Some(level),
                reason,
            } => write!(f, "invalid tree parameter {}[{}]: {}", field, level, reason),
            TreeError::InvalidParameter {
                field,
                level: None,
                reason,
            } => write!(f, "invalid tree parameter {}: {}", field, reason),
            TreeError::MissingLevel { field, level } => {
                write!(f, "tree option {} has no entry for level {}", field, level)
            }
        }
    }
}

impl std::error::Error for TreeError {}
