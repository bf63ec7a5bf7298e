use thiserror::Error;

/// Rejected projection parameters.
///
/// Field names use the CLI flag spelling so the same message reads well on
/// the command line and in an HTTP error body.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("--years must be between {min} and {max}, got {years}")]
    YearsOutOfRange { years: i64, min: u32, max: u32 },
}

impl InputError {
    pub fn field(&self) -> &'static str {
        match self {
            InputError::Negative { field, .. } | InputError::NonFinite { field } => *field,
            InputError::YearsOutOfRange { .. } => "--years",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_flag() {
        let err = InputError::Negative {
            field: "--annual-rate",
            value: -1.5,
        };
        assert_eq!(err.to_string(), "--annual-rate must be >= 0, got -1.5");
        assert_eq!(err.field(), "--annual-rate");

        let err = InputError::YearsOutOfRange {
            years: 51,
            min: 1,
            max: 50,
        };
        assert_eq!(err.to_string(), "--years must be between 1 and 50, got 51");
        assert_eq!(err.field(), "--years");
    }
}
