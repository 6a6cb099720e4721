//! Idempotent resource primitives (check + apply pattern).
pub mod dependency;
pub mod helpers;
pub mod package;
pub mod shell;
pub mod symlink;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
///
/// Resources whose presence cannot be checked locally (a package, whose
/// install is delegated to the package manager) implement only this trait.
/// Resources that can determine their own state implement the richer
/// [`Resource`] super-trait.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// # Errors
    ///
    /// Returns an error if an external command fails or a filesystem
    /// operation is denied.
    fn apply(&self) -> Result<ResourceChange>;
}

/// State of a resource on the host.
///
/// # Examples
///
/// ```
/// use dotfiles_bootstrap::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "regular file".into() };
///
/// assert_ne!(missing, correct);
/// assert_ne!(wrong, correct);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Something else occupies the resource's place.
    Incorrect {
        /// Description of what is there now.
        current: String,
    },
    /// Resource cannot be applied (e.g., its source is missing).
    Invalid {
        /// Reason why the resource cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use dotfiles_bootstrap::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let skipped = ResourceChange::Skipped { reason: "source missing".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, skipped);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was skipped.
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

/// Unified interface for resources that can be checked and applied.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined (e.g., permission
    /// denied while inspecting a path).
    fn current_state(&self) -> Result<ResourceState>;

    /// Determine if the resource needs to be changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Resource::current_state`].
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Fixed(ResourceState);

    impl Applicable for Fixed {
        fn description(&self) -> String {
            "fixed".to_string()
        }

        fn apply(&self) -> Result<ResourceChange> {
            Ok(ResourceChange::Applied)
        }
    }

    impl Resource for Fixed {
        fn current_state(&self) -> Result<ResourceState> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn needs_change_for_missing_and_incorrect() {
        assert!(Fixed(ResourceState::Missing).needs_change().unwrap());
        assert!(
            Fixed(ResourceState::Incorrect {
                current: "regular file".to_string()
            })
            .needs_change()
            .unwrap()
        );
    }

    #[test]
    fn no_change_for_correct_or_invalid() {
        assert!(!Fixed(ResourceState::Correct).needs_change().unwrap());
        assert!(
            !Fixed(ResourceState::Invalid {
                reason: "source missing".to_string()
            })
            .needs_change()
            .unwrap()
        );
    }
}
