//! Plugin identity and dependency model for plugin installation.
//!
//! The `pim-model` crate defines the entity every resolution step reasons
//! about: a [`Plugin`] at one requested version, its declared dependency
//! edges, the name-keyed transitive closure a resolver settles on, and the
//! provenance link back to whichever plugin required it.
//!
//! # Architecture
//!
//! Plugins live in a [`PluginSession`], an arena that hands out stable
//! [`PluginId`] keys. Dependency edges and parent links are stored as keys,
//! so the same plugin can be shared by many dependents and updated in place
//! (for example when a downloader records the archive location) without
//! copies drifting apart. A plugin with no assigned parent refers to itself
//! through [`ParentRef::Itself`].
//!
//! Version values come from [`pim_version::VersionNumber`]; malformed
//! version text surfaces as [`ModelError::InvalidVersion`].
//!
//! # Example
//!
//! ```
//! use pim_model::{Plugin, PluginSession};
//!
//! let mut session = PluginSession::new();
//! let root = session.insert(Plugin::new("configuration-as-code", "1.55").expect("valid"));
//! let old = session.insert(Plugin::new("credentials", "2.3.0").expect("valid"));
//! let new = session.insert(Plugin::new("credentials", "2.6.1").expect("valid"));
//!
//! session.record_recursive_dependency(root, old).expect("known ids");
//! let displaced = session.record_recursive_dependency(root, new).expect("known ids");
//! assert_eq!(displaced, Some(old));
//!
//! let resolved = session
//!     .recursive_dependency(root, "credentials")
//!     .expect("known id")
//!     .expect("recorded");
//! assert_eq!(resolved.version().as_str(), "2.6.1");
//! ```

pub mod config;
pub mod error;
pub mod plugin;
pub mod security;
pub mod session;

#[cfg(test)]
mod tests;

pub use self::config::SessionConfig;
pub use self::error::{ModelError, VersionField};
pub use self::plugin::{ARCHIVE_SUFFIX, EXPERIMENTAL, LATEST, ParentRef, Plugin};
pub use self::security::{SecurityVersion, SecurityWarning};
pub use self::session::{PluginId, PluginSession};
