#[derive(Debug, Clone, PartialEq)]
pub enum TerrainError {
    InvalidParameter {
        field: &'static str,
        reason: &'static str,
        value: f64,
    },
}

impl TerrainError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str, value: f64) -> Self {
        TerrainError::InvalidParameter {
            field,
            reason,
            value,
        }
    }
}

impl std::fmt::Display for TerrainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerrainError::InvalidParameter {
                field,
                reason,
                value,
            } => write!(f, "invalid terrain parameter {}={}: {}", field, value, reason),
        }
    }
}

impl std::error::Error for TerrainError {}
