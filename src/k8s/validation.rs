// Copyright 2024-2026 OpenShift Route Plugin Contributors
// SPDX-License-Identifier: Apache-2.0

//! Validation functions for resource names and traffic weights.
//!
//! Names follow the Kubernetes DNS-1123 rules; weights are percentages.

/// Maximum length of a DNS-1123 subdomain (route names).
pub const MAX_SUBDOMAIN_LENGTH: usize = 253;

/// Maximum length of a DNS-1123 label (service names).
pub const MAX_LABEL_LENGTH: usize = 63;

/// Total traffic share split across all managed backends.
pub const TOTAL_WEIGHT: i32 = 100;

/// Validation error types.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Field is empty but required.
    EmptyField(String),
    /// Field exceeds maximum length.
    MaxLengthExceeded { field: String, max: usize },
    /// Name is not a valid DNS-1123 name.
    InvalidName { field: String, reason: String },
    /// Weight is outside `0..=100`.
    WeightOutOfRange { field: String, value: i32 },
    /// Additional destinations ask for more than the canary share.
    WeightBudgetExceeded { requested: i32, available: i32 },
    /// The same service appears twice among additional destinations.
    DuplicateDestination(String),
    /// An additional destination names the stable or canary service.
    ReservedDestination(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "Field '{}' cannot be empty", field),
            Self::MaxLengthExceeded { field, max } => {
                write!(f, "Field '{}' exceeds maximum length of {}", field, max)
            }
            Self::InvalidName { field, reason } => {
                write!(f, "Field '{}' is not a valid name: {}", field, reason)
            }
            Self::WeightOutOfRange { field, value } => {
                write!(f, "{} must be within 0..=100, got {}", field, value)
            }
            Self::WeightBudgetExceeded { requested, available } => write!(
                f,
                "additional destinations request {} but only {} is available to the canary",
                requested, available
            ),
            Self::DuplicateDestination(name) => {
                write!(f, "service '{}' is listed more than once", name)
            }
            Self::ReservedDestination(name) => write!(
                f,
                "service '{}' is the stable or canary service and cannot be an additional destination",
                name
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

fn is_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

fn check_label(label: &str, field: &str) -> Result<(), ValidationError> {
    if label.is_empty() {
        return Err(ValidationError::InvalidName {
            field: field.to_string(),
            reason: "contains an empty segment".to_string(),
        });
    }

    if !label.chars().all(is_name_char) {
        return Err(ValidationError::InvalidName {
            field: field.to_string(),
            reason: "must contain only lowercase alphanumeric characters, '-' or '.'".to_string(),
        });
    }

    if label.starts_with('-') || label.ends_with('-') {
        return Err(ValidationError::InvalidName {
            field: field.to_string(),
            reason: "must start and end with an alphanumeric character".to_string(),
        });
    }

    Ok(())
}

/// Validate a resource name such as a Route name (DNS-1123 subdomain).
pub fn validate_resource_name(name: &str, field: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }

    if name.len() > MAX_SUBDOMAIN_LENGTH {
        return Err(ValidationError::MaxLengthExceeded {
            field: field.to_string(),
            max: MAX_SUBDOMAIN_LENGTH,
        });
    }

    for label in name.split('.') {
        check_label(label, field)?;
    }

    Ok(())
}

/// Validate a Service name (DNS-1123 label, no dots).
pub fn validate_service_name(name: &str, field: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }

    if name.len() > MAX_LABEL_LENGTH {
        return Err(ValidationError::MaxLengthExceeded {
            field: field.to_string(),
            max: MAX_LABEL_LENGTH,
        });
    }

    check_label(name, field)
}

/// Validate a percentage weight.
pub fn validate_weight(value: i32, field: &str) -> Result<(), ValidationError> {
    if !(0..=TOTAL_WEIGHT).contains(&value) {
        return Err(ValidationError::WeightOutOfRange {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
