//! Error types and result handling for fixture synthesis.

use std::fmt;

/// Comprehensive error type for fixture synthesis failures
#[derive(Debug)]
pub enum SpecimenError {
    /// Invalid construction input (inverted bounds, zero limits, ...)
    InvalidArgument { message: String },

    /// No production rule applies to the requested type
    UnsupportedType {
        type_name: &'static str,
        reason: String,
    },

    /// A single property's synthesis or assignment failed
    PropertyAssignment {
        property: &'static str,
        source: Box<SpecimenError>,
    },

    /// Internal error in the synthesis engine
    InternalError { message: String },
}

impl fmt::Display for SpecimenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecimenError::InvalidArgument { message } => {
                write!(f, "Invalid argument: {}", message)
            }
            SpecimenError::UnsupportedType { type_name, reason } => {
                write!(f, "Unsupported type `{}`: {}", type_name, reason)
            }
            SpecimenError::PropertyAssignment { property, source } => {
                write!(f, "Failed to assign property `{}`: {}", property, source)
            }
            SpecimenError::InternalError { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for SpecimenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpecimenError::PropertyAssignment { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Helper functions for creating SpecimenError instances with context
impl SpecimenError {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an unsupported type error for `T`
    pub fn unsupported<T: ?Sized>(reason: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: std::any::type_name::<T>(),
            reason: reason.into(),
        }
    }

    /// Wrap a failure with the name of the property being assigned
    pub fn property(property: &'static str, source: SpecimenError) -> Self {
        Self::PropertyAssignment {
            property,
            source: Box::new(source),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// The name of the property this error is attached to, if any
    pub fn property_name(&self) -> Option<&'static str> {
        match self {
            SpecimenError::PropertyAssignment { property, .. } => Some(property),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate
pub type SpecimenResult<T> = Result<T, SpecimenError>;
