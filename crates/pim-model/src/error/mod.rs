//! Domain errors raised by the plugin model.
//!
//! Version parse failures are never caught here: they surface as
//! [`ModelError::InvalidVersion`] with the offending text attached, and the
//! caller decides whether to skip the plugin or abort the session.

use std::fmt;

use pim_version::VersionError;
use thiserror::Error;

use crate::session::PluginId;

/// Which version-valued field of a plugin failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionField {
    /// The plugin's own version.
    Version,
    /// The minimum host platform version.
    JenkinsVersion,
}

impl VersionField {
    /// Returns the human-readable field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::JenkinsVersion => "required Jenkins version",
        }
    }
}

impl fmt::Display for VersionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors arising from plugin model operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A plugin was constructed with a blank name.
    #[error("plugin name must not be empty")]
    EmptyName,

    /// A version string could not be parsed.
    #[error("invalid {field} '{input}' for plugin '{plugin}': {source}")]
    InvalidVersion {
        /// Plugin the version belongs to.
        plugin: String,
        /// Field being assigned.
        field: VersionField,
        /// Text that failed to parse.
        input: String,
        /// Underlying parse failure.
        #[source]
        source: VersionError,
    },

    /// A plugin id does not belong to the session it was used with.
    #[error("plugin {id} is not part of this session")]
    UnknownPlugin {
        /// The dangling id.
        id: PluginId,
    },

    /// Walking the parent chain did not reach a root.
    #[error("parent chain of plugin '{plugin}' does not terminate after {depth} steps")]
    ParentCycle {
        /// Plugin whose provenance was requested.
        plugin: String,
        /// Number of links followed before giving up.
        depth: usize,
    },

    /// A security advisory carried a pattern that is not a valid regex.
    #[error("invalid security version pattern '{pattern}': {source}")]
    InvalidPattern {
        /// Pattern text as supplied.
        pattern: String,
        /// Underlying regex compilation error.
        #[source]
        source: regex::Error,
    },
}

impl ModelError {
    /// Creates a new `InvalidVersion` error.
    #[must_use]
    pub fn invalid_version(
        plugin: impl Into<String>,
        field: VersionField,
        input: impl Into<String>,
        source: VersionError,
    ) -> Self {
        Self::InvalidVersion {
            plugin: plugin.into(),
            field,
            input: input.into(),
            source,
        }
    }

    /// Creates a new `UnknownPlugin` error.
    #[must_use]
    pub const fn unknown_plugin(id: PluginId) -> Self {
        Self::UnknownPlugin { id }
    }
}
