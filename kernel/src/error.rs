use std::fmt::Display;

use error_stack::Context;

#[derive(Debug)]
pub enum KernelError {
    NotFound { entity: &'static str },
    ConditionsNotMet { reason: String },
    Timeout,
    Internal,
}

impl KernelError {
    pub fn not_found(entity: &'static str) -> Self {
        KernelError::NotFound { entity }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        KernelError::ConditionsNotMet {
            reason: reason.into(),
        }
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound { entity } => write!(f, "{entity} not found"),
            KernelError::ConditionsNotMet { reason } => write!(f, "{reason}"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

#[cfg(test)]
mod test {
    use super::KernelError;

    #[test]
    fn not_found_message_names_the_entity() {
        assert_eq!(KernelError::not_found("booking").to_string(), "booking not found");
        assert_eq!(KernelError::not_found("item").to_string(), "item not found");
        assert_eq!(KernelError::not_found("user").to_string(), "user not found");
    }

    #[test]
    fn rejection_message_is_surfaced_verbatim() {
        let error = KernelError::rejected("owner cannot book their own item");
        assert_eq!(error.to_string(), "owner cannot book their own item");
    }
}
