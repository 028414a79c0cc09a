//! Error types for bone-table loading and validation.

use thiserror::Error;

/// Errors produced while loading or validating a [`BoneTable`](crate::BoneTable).
#[derive(Debug, Error)]
pub enum NamingError {
    /// A slot's canonical name is empty.
    #[error("alias slot {index} has an empty canonical name")]
    EmptyCanonical {
        /// Position of the offending slot in declaration order.
        index: usize,
    },

    /// An alias pattern under a slot is empty.
    #[error("alias slot `{canonical}` contains an empty pattern")]
    EmptyPattern {
        /// Canonical name of the slot holding the empty pattern.
        canonical: String,
    },

    /// Two slots declare the same canonical name.
    #[error("duplicate canonical name `{name}` in alias table")]
    DuplicateCanonical {
        /// The repeated canonical name.
        name: String,
    },

    /// The table JSON could not be parsed or written.
    #[error("failed to read bone table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience alias for naming results.
pub type NamingResult<T> = Result<T, NamingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_offender() {
        let err = NamingError::DuplicateCanonical {
            name: "Hips".to_string(),
        };
        assert!(err.to_string().contains("Hips"));

        let err = NamingError::EmptyCanonical { index: 3 };
        assert!(err.to_string().contains('3'));
    }
}
