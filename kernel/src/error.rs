use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum KernelError {
    Concurrency,
    Timeout,
    Internal,
    NotFound,
    InvalidTransition,
    Validation,
    Forbidden,
    Conflict,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Concurrency => write!(f, "Record was modified concurrently"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
            KernelError::NotFound => write!(f, "Target not found"),
            KernelError::InvalidTransition => write!(f, "Operation not allowed in current state"),
            KernelError::Validation => write!(f, "Invalid input"),
            KernelError::Forbidden => write!(f, "Operation not permitted for this user"),
            KernelError::Conflict => write!(f, "Asset already has an open loan"),
        }
    }
}

impl Context for KernelError {}
