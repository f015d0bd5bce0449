//! Error types for `atrium-widgets`.
//!
//! Widgets only fail at construction or when props are replaced; every
//! event-handling path is infallible and clamps instead of erroring.

/// Errors raised when widget props cannot describe a valid widget.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WidgetError {
    /// A prop is outside the range the widget can render.
    #[error("invalid prop '{prop}': {reason}")]
    InvalidProp { prop: &'static str, reason: String },

    /// A list prop that must hold at least one entry was empty.
    #[error("prop '{prop}' must not be empty")]
    Empty { prop: &'static str },
}

impl WidgetError {
    pub(crate) fn invalid(prop: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidProp {
            prop,
            reason: reason.into(),
        }
    }
}

/// Reject non-finite or non-positive numeric props.
pub(crate) fn require_positive(prop: &'static str, value: f32) -> Result<(), WidgetError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(WidgetError::invalid(
            prop,
            format!("expected a finite value > 0, got {value}"),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn positive_values_pass() {
        assert!(require_positive("stiffness", 1.0).is_ok());
    }

    #[test]
    fn zero_nan_and_negative_fail() {
        for bad in [0.0, -3.0, f32::NAN, f32::INFINITY] {
            let err = require_positive("stiffness", bad).unwrap_err();
            assert!(matches!(err, WidgetError::InvalidProp { prop: "stiffness", .. }));
        }
    }

    #[test]
    fn messages_name_the_prop() {
        let err = WidgetError::Empty { prop: "words" };
        assert_eq!(err.to_string(), "prop 'words' must not be empty");
    }
}
