//! Security advisories attached to plugins.
//!
//! Advisories use the update-center warning shape: an id, a message, an
//! optional url, and a list of affected version ranges. Each range names
//! the last affected version, a regular expression over version text, or
//! both; the pattern wins when present.

use pim_version::VersionNumber;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A compiled version pattern that remembers its source text.
#[derive(Debug, Clone)]
struct VersionPattern {
    text: String,
    regex: Regex,
}

impl VersionPattern {
    fn compile(text: &str) -> Result<Self, ModelError> {
        let regex =
            Regex::new(&format!("^(?:{text})$")).map_err(|source| ModelError::InvalidPattern {
                pattern: text.to_owned(),
                source,
            })?;
        Ok(Self {
            text: text.to_owned(),
            regex,
        })
    }
}

impl PartialEq for VersionPattern {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSecurityVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_version: Option<VersionNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
}

/// A range of plugin versions affected by an advisory.
///
/// # Example
///
/// ```
/// use pim_model::SecurityVersion;
/// use pim_version::VersionNumber;
///
/// let range = SecurityVersion::new(None, Some(r"1\.[0-4](\..*)?")).expect("valid pattern");
/// assert!(range.matches(&VersionNumber::parse("1.3.2").expect("valid")));
/// assert!(!range.matches(&VersionNumber::parse("1.5").expect("valid")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSecurityVersion", into = "RawSecurityVersion")]
pub struct SecurityVersion {
    last_version: Option<VersionNumber>,
    pattern: Option<VersionPattern>,
}

impl SecurityVersion {
    /// Creates a version range. The pattern must match the whole version
    /// text.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidPattern`] if the pattern does not
    /// compile.
    pub fn new(
        last_version: Option<VersionNumber>,
        pattern: Option<&str>,
    ) -> Result<Self, ModelError> {
        let compiled = pattern.map(VersionPattern::compile).transpose()?;
        Ok(Self {
            last_version,
            pattern: compiled,
        })
    }

    /// Returns the last affected version, if declared.
    #[must_use]
    pub const fn last_version(&self) -> Option<&VersionNumber> {
        self.last_version.as_ref()
    }

    /// Returns the pattern text, if declared.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_ref().map(|pattern| pattern.text.as_str())
    }

    /// Returns `true` when `version` falls within this range.
    #[must_use]
    pub fn matches(&self, version: &VersionNumber) -> bool {
        match (&self.pattern, &self.last_version) {
            (Some(pattern), _) => pattern.regex.is_match(version.as_str()),
            (None, Some(last)) => version <= last,
            (None, None) => false,
        }
    }
}

impl TryFrom<RawSecurityVersion> for SecurityVersion {
    type Error = ModelError;

    fn try_from(raw: RawSecurityVersion) -> Result<Self, Self::Error> {
        Self::new(raw.last_version, raw.pattern.as_deref())
    }
}

impl From<SecurityVersion> for RawSecurityVersion {
    fn from(version: SecurityVersion) -> Self {
        Self {
            last_version: version.last_version,
            pattern: version.pattern.map(|pattern| pattern.text),
        }
    }
}

/// A security advisory applicable to a plugin.
///
/// # Example
///
/// ```
/// use pim_model::{SecurityVersion, SecurityWarning};
/// use pim_version::VersionNumber;
///
/// let last = VersionNumber::parse("4.2").expect("valid");
/// let warning = SecurityWarning::new("SECURITY-1234", "Stored XSS")
///     .with_versions(vec![SecurityVersion::new(Some(last), None).expect("valid")]);
///
/// assert!(warning.affects(&VersionNumber::parse("4.1").expect("valid")));
/// assert!(!warning.affects(&VersionNumber::parse("4.3").expect("valid")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityWarning {
    id: String,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default)]
    versions: Vec<SecurityVersion>,
}

impl SecurityWarning {
    /// Creates an advisory with no url and no affected ranges.
    #[must_use]
    pub fn new(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            url: None,
            versions: Vec::new(),
        }
    }

    /// Sets the advisory url.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the affected version ranges.
    #[must_use]
    pub fn with_versions(mut self, versions: Vec<SecurityVersion>) -> Self {
        self.versions = versions;
        self
    }

    /// Returns the advisory id.
    #[must_use]
    pub const fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the advisory message.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns the advisory url, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the affected version ranges.
    #[must_use]
    pub const fn versions(&self) -> &[SecurityVersion] {
        self.versions.as_slice()
    }

    /// Returns `true` when any affected range contains `version`.
    #[must_use]
    pub fn affects(&self, version: &VersionNumber) -> bool {
        self.versions.iter().any(|range| range.matches(version))
    }
}
