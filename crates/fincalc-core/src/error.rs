use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FincalcError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Value is not a finite number")]
    NotFinite,

    #[error("Value {value} exceeds the maximum safe calculation magnitude")]
    ExceedsSafeRange { value: f64 },

    #[error("Value {value} is below the minimum of {min}")]
    BelowMinimum { value: f64, min: f64 },

    #[error("Value {value} is above the maximum of {max}")]
    AboveMaximum { value: f64, max: f64 },

    #[error("Value must not be zero")]
    ZeroNotAllowed,

    #[error("Value {value} must not be negative")]
    NegativeNotAllowed { value: f64 },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for FincalcError {
    fn from(e: serde_json::Error) -> Self {
        FincalcError::SerializationError(e.to_string())
    }
}
