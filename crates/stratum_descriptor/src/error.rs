//! Error types for descriptor loading and lookup.

/// Errors raised by the descriptor store.
///
/// Both variants are fatal to the current resolution pass: the caller must
/// fix the descriptor set and reload.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Two descriptors were loaded with the same module name.
    #[error("duplicate module descriptor `{name}`")]
    DuplicateModule {
        /// The module name that appeared more than once.
        name: String,
    },

    /// A lookup was made for a module name with no descriptor.
    #[error("no descriptor for module `{name}`")]
    ModuleNotFound {
        /// The module name that was requested.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_module_display() {
        let err = StoreError::DuplicateModule {
            name: "Core".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate module descriptor `Core`");
    }

    #[test]
    fn module_not_found_display() {
        let err = StoreError::ModuleNotFound {
            name: "Missing".to_string(),
        };
        assert_eq!(err.to_string(), "no descriptor for module `Missing`");
    }
}
