//! Dotted version numbers for plugin resolution.
//!
//! The `pim-version` crate provides [`VersionNumber`], the comparable version
//! value every resolution decision rests on. Versions are split into numeric
//! and qualifier components and compared component by component, padding the
//! shorter side with zero so that `1.0` and `1.0.0` are the same version.
//!
//! # Example
//!
//! ```
//! use pim_version::VersionNumber;
//!
//! let older: VersionNumber = "4.2.2".parse().expect("valid version");
//! let newer: VersionNumber = "4.11.0".parse().expect("valid version");
//! assert!(older < newer);
//! assert_eq!(older.to_string(), "4.2.2");
//! ```

mod error;
mod version;

pub use self::error::VersionError;
pub use self::version::VersionNumber;
