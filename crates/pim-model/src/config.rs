//! Session configuration.

/// Default bound on parent links followed by
/// [`crate::PluginSession::provenance`].
pub const DEFAULT_MAX_PROVENANCE_DEPTH: usize = 1024;

/// Limits applied by a [`crate::PluginSession`].
///
/// # Defaults
///
/// - `max_provenance_depth`: 1 024
///
/// # Example
///
/// ```
/// use pim_model::SessionConfig;
///
/// let config = SessionConfig::default();
/// assert_eq!(config.max_provenance_depth(), 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum number of parent links followed before a chain is reported
    /// as cyclic.
    max_provenance_depth: usize,
}

impl SessionConfig {
    /// Creates a configuration with explicit values.
    #[must_use]
    pub const fn new(max_provenance_depth: usize) -> Self {
        Self {
            max_provenance_depth,
        }
    }

    /// Returns the maximum number of parent links followed.
    #[must_use]
    pub const fn max_provenance_depth(&self) -> usize {
        self.max_provenance_depth
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PROVENANCE_DEPTH)
    }
}
