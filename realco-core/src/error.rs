// realco-core/src/error.rs

use crate::infrastructure::error::{InfrastructureError, WarehouseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RealcoError {
    // --- ERREURS ENTREPÔT (Timeouts, Sessions, SQL) ---
    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    // --- ERREURS D'INFRASTRUCTURE (IO, Parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS GÉNÉRIQUES / APPLICATIVES ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl RealcoError {
    /// The warehouse failure behind this error, if any.
    pub fn as_warehouse(&self) -> Option<&WarehouseError> {
        match self {
            RealcoError::Warehouse(err) => Some(err),
            _ => None,
        }
    }
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for RealcoError {
    fn from(err: std::io::Error) -> Self {
        RealcoError::Infrastructure(InfrastructureError::Io(err))
    }
}
