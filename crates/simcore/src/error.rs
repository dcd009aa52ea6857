use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("Unknown cycle kind: {0}")]
    UnknownCycle(String),

    #[error("Unknown engine layout: {0}")]
    UnknownLayout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logger setup failed: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl SimError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter { field, reason: reason.into() }
    }

    /// Name of the offending field for `InvalidParameter`, `None` otherwise.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            SimError::InvalidParameter { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;

/// Fails unless `value` is finite and strictly positive.
pub fn require_positive(field: &'static str, value: f64) -> SimResult<f64> {
    if !value.is_finite() {
        return Err(SimError::invalid(field, format!("must be finite, got {value}")));
    }
    if value <= 0.0 {
        return Err(SimError::invalid(field, format!("must be positive, got {value}")));
    }
    Ok(value)
}

/// Fails unless `value` is finite and strictly greater than `bound`.
pub fn require_greater(field: &'static str, value: f64, bound: f64, what: &str) -> SimResult<f64> {
    if !value.is_finite() {
        return Err(SimError::invalid(field, format!("must be finite, got {value}")));
    }
    if value <= bound {
        return Err(SimError::invalid(field, format!("must exceed {what} ({bound}), got {value}")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive_rejects_zero_and_nan() {
        assert!(require_positive("p", 1.0).is_ok());
        assert_eq!(require_positive("p", 0.0).unwrap_err().field(), Some("p"));
        assert_eq!(require_positive("p", -3.0).unwrap_err().field(), Some("p"));
        assert_eq!(require_positive("p", f64::NAN).unwrap_err().field(), Some("p"));
    }

    #[test]
    fn test_require_greater_is_strict() {
        assert!(require_greater("r", 1.0, 1.0, "one").is_err());
        assert!(require_greater("r", 1.0 + 1e-12, 1.0, "one").is_ok());
        assert!(require_greater("r", f64::INFINITY, 1.0, "one").is_err());
    }

    #[test]
    fn test_error_message_names_field() {
        let err = SimError::invalid("compression_ratio", "must exceed 1");
        assert_eq!(err.to_string(), "Invalid parameter `compression_ratio`: must exceed 1");
    }

    #[test]
    fn test_sim_error_boxes_as_std_error() {
        fn assert_std_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_std_error::<SimError>();
        assert_std_error::<log::SetLoggerError>();

        let boxed: Box<dyn std::error::Error> = SimError::UnknownCycle("wankel".into()).into();
        assert_eq!(boxed.to_string(), "Unknown cycle kind: wankel");
    }
}
