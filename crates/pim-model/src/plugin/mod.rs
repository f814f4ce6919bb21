//! The plugin entity: one named plugin at one requested version.
//!
//! A [`Plugin`] carries the identity a resolver reasons about (name,
//! version, group id and download url), the relations it discovers while
//! building the install set, and a handful of resolution flags. Relations
//! are [`PluginId`] keys into the owning [`crate::PluginSession`] rather
//! than owned copies, so a download location or advisory recorded on one
//! plugin is visible from every dependency edge that points at it.
//!
//! # Identity and ordering
//!
//! Equality and hashing cover exactly `name`, `version`, `group_id` and
//! `url`. Two plugins that differ only in where they are downloaded from are
//! therefore distinct, and resolvers that want "same plugin regardless of
//! source" must reconcile by name themselves.
//!
//! [`Plugin::resolution_cmp`] is the resolver's ordering: same-name plugins
//! order by version, different names order lexically. It reports
//! [`Ordering::Equal`] for plugins that share name and version but differ in
//! group id or url, even though such plugins are not `==`. The [`Ord`]
//! implementation breaks those ties on group id and then url so that sorted
//! collections stay consistent with equality.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use camino::{Utf8Path, Utf8PathBuf};
use pim_version::VersionNumber;
use tracing::debug;

use crate::error::{ModelError, VersionField};
use crate::security::SecurityWarning;
use crate::session::PluginId;

/// Suffix appended to a plugin name to form its archive file name.
pub const ARCHIVE_SUFFIX: &str = ".jpi";

/// Version sentinel requesting the newest release.
pub const LATEST: &str = "latest";

/// Version sentinel requesting the experimental channel.
pub const EXPERIMENTAL: &str = "experimental";

/// Tracing target for plugin entity operations.
const PLUGIN_TARGET: &str = "pim_model::plugin";

/// Who required a plugin.
///
/// A freshly constructed plugin is its own parent until a resolver assigns
/// the plugin that pulled it in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// No parent assigned; the plugin was requested directly.
    #[default]
    Itself,
    /// The plugin was required by another plugin in the same session.
    Plugin(PluginId),
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

/// A named plugin at one version, with its dependency relations.
///
/// # Example
///
/// ```
/// use pim_model::Plugin;
///
/// let plugin = Plugin::new("git", "")
///     .expect("valid plugin")
///     .with_url("https://example.com/git.hpi");
///
/// assert!(plugin.is_latest());
/// assert_eq!(plugin.archive_file_name(), "git.jpi");
/// assert_eq!(plugin.to_string(), "git latest https://example.com/git.hpi");
/// ```
#[derive(Debug, Clone)]
pub struct Plugin {
    name: String,
    original_name: String,
    version: VersionNumber,
    group_id: Option<String>,
    url: Option<String>,
    file: Option<Utf8PathBuf>,
    optional: bool,
    jenkins_version: Option<VersionNumber>,
    direct_dependencies: Vec<PluginId>,
    recursive_dependencies: BTreeMap<String, PluginId>,
    parent: ParentRef,
    security_warnings: Vec<SecurityWarning>,
    latest: bool,
    experimental: bool,
}

impl Plugin {
    /// Creates a plugin from a name and a requested version.
    ///
    /// An empty version requests [`LATEST`]. The `latest` and
    /// `experimental` flags record the sentinel that was requested and are
    /// not recomputed by later calls to [`Plugin::set_version`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyName`] for a blank name and
    /// [`ModelError::InvalidVersion`] when the version does not parse.
    pub fn new(name: impl Into<String>, version: &str) -> Result<Self, ModelError> {
        let plugin_name = name.into();
        if plugin_name.trim().is_empty() {
            return Err(ModelError::EmptyName);
        }
        let requested = if version.is_empty() { LATEST } else { version };
        let parsed = VersionNumber::parse(requested).map_err(|source| {
            ModelError::invalid_version(&plugin_name, VersionField::Version, requested, source)
        })?;
        Ok(Self {
            original_name: plugin_name.clone(),
            name: plugin_name,
            version: parsed,
            group_id: None,
            url: None,
            file: None,
            optional: false,
            jenkins_version: None,
            direct_dependencies: Vec::new(),
            recursive_dependencies: BTreeMap::new(),
            parent: ParentRef::Itself,
            security_warnings: Vec::new(),
            latest: requested == LATEST,
            experimental: requested == EXPERIMENTAL,
        })
    }

    /// Sets an explicit download url. An empty url means none.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.set_url(Some(url.into()));
        self
    }

    /// Sets the group id. An empty group id means none.
    #[must_use]
    pub fn with_group_id(mut self, group_id: impl Into<String>) -> Self {
        self.set_group_id(Some(group_id.into()));
        self
    }

    /// Returns the current name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the name the plugin was constructed with.
    #[must_use]
    pub const fn original_name(&self) -> &str {
        self.original_name.as_str()
    }

    /// Returns the version.
    #[must_use]
    pub const fn version(&self) -> &VersionNumber {
        &self.version
    }

    /// Returns the group id, if any.
    #[must_use]
    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref()
    }

    /// Returns the explicit download url, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the local archive location once downloaded.
    #[must_use]
    pub fn file(&self) -> Option<&Utf8Path> {
        self.file.as_deref()
    }

    /// Returns `true` when the dependency edge that introduced this plugin
    /// is optional.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Returns the minimum host platform version, if declared.
    #[must_use]
    pub const fn jenkins_version(&self) -> Option<&VersionNumber> {
        self.jenkins_version.as_ref()
    }

    /// Returns the declared direct dependencies in manifest order.
    #[must_use]
    pub const fn direct_dependencies(&self) -> &[PluginId] {
        self.direct_dependencies.as_slice()
    }

    /// Returns the resolved transitive closure, one plugin per name.
    #[must_use]
    pub const fn recursive_dependencies(&self) -> &BTreeMap<String, PluginId> {
        &self.recursive_dependencies
    }

    /// Returns the parent reference.
    #[must_use]
    pub const fn parent(&self) -> ParentRef {
        self.parent
    }

    /// Returns every advisory attached to this plugin.
    #[must_use]
    pub const fn security_warnings(&self) -> &[SecurityWarning] {
        self.security_warnings.as_slice()
    }

    /// Returns the advisories that affect the plugin's current version.
    pub fn active_security_warnings(&self) -> impl Iterator<Item = &SecurityWarning> {
        self.security_warnings
            .iter()
            .filter(|warning| warning.affects(&self.version))
    }

    /// Returns `true` when the plugin was requested as `latest` (or with no
    /// version).
    #[must_use]
    pub const fn is_latest(&self) -> bool {
        self.latest
    }

    /// Returns `true` when the plugin was requested as `experimental`.
    #[must_use]
    pub const fn is_experimental(&self) -> bool {
        self.experimental
    }

    /// Returns the on-disk archive name derived from the current name.
    #[must_use]
    pub fn archive_file_name(&self) -> String {
        format!("{}{ARCHIVE_SUFFIX}", self.name)
    }

    /// Renames the plugin. The original name is kept.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let renamed = name.into();
        debug!(
            target: PLUGIN_TARGET,
            original = self.original_name.as_str(),
            from = self.name.as_str(),
            to = renamed.as_str(),
            "renaming plugin"
        );
        self.name = renamed;
    }

    /// Replaces the version without touching the sentinel flags.
    pub fn set_version(&mut self, version: VersionNumber) {
        self.version = version;
    }

    /// Replaces the download url. An empty url means none.
    pub fn set_url(&mut self, url: Option<String>) {
        self.url = non_empty(url);
    }

    /// Records where the archive was stored.
    pub fn set_file(&mut self, file: Option<Utf8PathBuf>) {
        self.file = file;
    }

    /// Marks the introducing dependency edge as optional or mandatory.
    pub const fn set_optional(&mut self, optional: bool) {
        self.optional = optional;
    }

    /// Replaces the group id. An empty group id means none.
    pub fn set_group_id(&mut self, group_id: Option<String>) {
        self.group_id = non_empty(group_id);
    }

    /// Replaces the direct dependency list wholesale.
    pub fn set_direct_dependencies(&mut self, dependencies: Vec<PluginId>) {
        self.direct_dependencies = dependencies;
    }

    /// Replaces the transitive closure wholesale.
    pub fn set_recursive_dependencies(&mut self, dependencies: BTreeMap<String, PluginId>) {
        self.recursive_dependencies = dependencies;
    }

    /// Replaces the parent reference.
    pub const fn set_parent(&mut self, parent: ParentRef) {
        self.parent = parent;
    }

    /// Parses and records the minimum host platform version. An empty
    /// string clears it.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidVersion`] when the version does not
    /// parse; the previous value is kept.
    pub fn set_jenkins_version(&mut self, jenkins_version: &str) -> Result<(), ModelError> {
        if jenkins_version.is_empty() {
            self.jenkins_version = None;
            return Ok(());
        }
        let parsed = VersionNumber::parse(jenkins_version).map_err(|source| {
            ModelError::invalid_version(
                self.name.as_str(),
                VersionField::JenkinsVersion,
                jenkins_version,
                source,
            )
        })?;
        self.jenkins_version = Some(parsed);
        Ok(())
    }

    /// Replaces the attached advisories wholesale.
    pub fn set_security_warnings(&mut self, security_warnings: Vec<SecurityWarning>) {
        self.security_warnings = security_warnings;
    }

    pub(crate) fn push_direct_dependency(&mut self, dependency: PluginId) {
        self.direct_dependencies.push(dependency);
    }

    pub(crate) fn insert_recursive_dependency(
        &mut self,
        name: String,
        dependency: PluginId,
    ) -> Option<PluginId> {
        self.recursive_dependencies.insert(name, dependency)
    }

    /// Orders plugins the way a resolver picks between candidates.
    ///
    /// Equal plugins compare equal. Otherwise plugins with the same name
    /// order by version and plugins with different names order by name.
    /// Plugins sharing name and version but not group id or url also
    /// compare equal here; use [`Ord::cmp`] for an order that agrees with
    /// `==`.
    #[must_use]
    pub fn resolution_cmp(&self, other: &Self) -> Ordering {
        if self == other {
            Ordering::Equal
        } else if self.name == other.name {
            self.version.cmp(&other.version)
        } else {
            self.name.cmp(&other.name)
        }
    }
}

impl PartialEq for Plugin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.group_id == other.group_id
            && self.url == other.url
    }
}

impl Eq for Plugin {}

impl Hash for Plugin {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version.hash(state);
        self.group_id.hash(state);
        self.url.hash(state);
    }
}

impl PartialOrd for Plugin {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Plugin {
    fn cmp(&self, other: &Self) -> Ordering {
        self.resolution_cmp(other)
            .then_with(|| self.group_id.cmp(&other.group_id))
            .then_with(|| self.url.cmp(&other.url))
    }
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)?;
        if let Some(url) = &self.url {
            write!(f, " {url}")?;
        }
        Ok(())
    }
}
