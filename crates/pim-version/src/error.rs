//! Errors raised while parsing version strings.

use thiserror::Error;

/// Errors arising from [`crate::VersionNumber::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// The version string was empty.
    #[error("version string must not be empty")]
    Empty,

    /// A separator was leading, trailing, or doubled.
    #[error("empty component in version '{input}'")]
    EmptySegment {
        /// Version text as supplied.
        input: String,
    },

    /// A numeric component does not fit in 64 bits.
    #[error("component '{segment}' of version '{input}' is too large")]
    NumericOverflow {
        /// Version text as supplied.
        input: String,
        /// The numeric run that overflowed.
        segment: String,
    },
}
