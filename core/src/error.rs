use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Integrity violation in {table}: {detail}")]
    IntegrityViolation { table: &'static str, detail: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DashResult<T> = Result<T, DashError>;

impl DashError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig { reason: reason.into() }
    }

    pub fn integrity(table: &'static str, detail: impl Into<String>) -> Self {
        Self::IntegrityViolation { table, detail: detail.into() }
    }
}
