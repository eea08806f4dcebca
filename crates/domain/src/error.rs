use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl DomainError {
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }
}

/// Why a detection pass produced no heart-rate estimate.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum Inconclusive {
    #[error("only {found} candidate peaks, need at least {required}")]
    TooFewCandidates { found: usize, required: usize },
    #[error("only {found} peaks survived refractory filtering")]
    TooFewSurvivors { found: usize },
    #[error("average peak interval {average} is not usable")]
    DegenerateInterval { average: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_helper_wraps_message() {
        let err = DomainError::validation("delta_x must be positive");
        assert_eq!(err.to_string(), "validation failed: delta_x must be positive");
    }

    #[test]
    fn inconclusive_reason_is_readable() {
        let reason = Inconclusive::TooFewCandidates {
            found: 2,
            required: 3,
        };
        assert!(reason.to_string().contains("only 2 candidate peaks"));
    }
}
