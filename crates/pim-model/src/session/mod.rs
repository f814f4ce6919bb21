//! Arena owning every plugin of one resolution session.
//!
//! Plugins refer to each other through [`PluginId`] keys handed out by
//! [`PluginSession::insert`]. The session is the single owner, so a plugin
//! shared by several dependency edges is stored once and mutations made
//! through any edge are seen by all of them.

use std::fmt;

use tracing::debug;

use crate::config::SessionConfig;
use crate::error::ModelError;
use crate::plugin::{ParentRef, Plugin};

/// Tracing target for plugin session operations.
const SESSION_TARGET: &str = "pim_model::session";

/// Stable key of a plugin within its [`PluginSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PluginId(usize);

impl PluginId {
    /// Returns the position of the plugin in insertion order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owner of the plugins discovered while resolving one install set.
///
/// # Example
///
/// ```
/// use pim_model::{Plugin, PluginSession};
///
/// let mut session = PluginSession::new();
/// let workflow = session.insert(Plugin::new("workflow-aggregator", "2.6").expect("valid"));
/// let git = session.insert(Plugin::new("git", "4.11.0").expect("valid"));
///
/// session.add_direct_dependency(workflow, git).expect("known ids");
/// session.set_parent(git, workflow).expect("known ids");
///
/// assert_eq!(session.parent_of(workflow).expect("known id"), workflow);
/// assert_eq!(
///     session.describe_provenance(git).expect("known id"),
///     "git 4.11.0 <- workflow-aggregator 2.6"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct PluginSession {
    plugins: Vec<Plugin>,
    config: SessionConfig,
}

impl PluginSession {
    /// Creates an empty session with default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session with the given limits.
    #[must_use]
    pub const fn with_config(config: SessionConfig) -> Self {
        Self {
            plugins: Vec::new(),
            config,
        }
    }

    /// Returns the session limits.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Takes ownership of a plugin and returns its key.
    pub fn insert(&mut self, plugin: Plugin) -> PluginId {
        let id = PluginId(self.plugins.len());
        debug!(
            target: SESSION_TARGET,
            id = %id,
            plugin = %plugin,
            "adding plugin to session"
        );
        self.plugins.push(plugin);
        id
    }

    /// Looks up a plugin by key.
    #[must_use]
    pub fn get(&self, id: PluginId) -> Option<&Plugin> {
        self.plugins.get(id.0)
    }

    /// Looks up a plugin by key for mutation.
    #[must_use]
    pub fn get_mut(&mut self, id: PluginId) -> Option<&mut Plugin> {
        self.plugins.get_mut(id.0)
    }

    /// Returns the plugin with the given key, or an error if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownPlugin`] if the key was not issued by
    /// this session.
    pub fn plugin(&self, id: PluginId) -> Result<&Plugin, ModelError> {
        self.get(id).ok_or_else(|| ModelError::unknown_plugin(id))
    }

    /// Returns the plugin with the given key for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownPlugin`] if the key was not issued by
    /// this session.
    pub fn plugin_mut(&mut self, id: PluginId) -> Result<&mut Plugin, ModelError> {
        self.get_mut(id).ok_or_else(|| ModelError::unknown_plugin(id))
    }

    /// Returns the number of plugins in the session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns `true` when the session holds no plugins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Iterates over every plugin in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (PluginId, &Plugin)> {
        self.plugins
            .iter()
            .enumerate()
            .map(|(index, plugin)| (PluginId(index), plugin))
    }

    /// Returns every plugin whose current name is `name`.
    pub fn find_by_name<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = (PluginId, &'a Plugin)> + 'a {
        self.iter().filter(move |(_, plugin)| plugin.name() == name)
    }

    /// Resolves the parent of a plugin, mapping "no parent" to the plugin
    /// itself.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownPlugin`] if `id` is unknown.
    pub fn parent_of(&self, id: PluginId) -> Result<PluginId, ModelError> {
        match self.plugin(id)?.parent() {
            ParentRef::Itself => Ok(id),
            ParentRef::Plugin(parent) => Ok(parent),
        }
    }

    /// Records that `parent` required `child`. Passing the same key twice
    /// resets the child to being its own parent.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownPlugin`] if either key is unknown.
    pub fn set_parent(&mut self, child: PluginId, parent: PluginId) -> Result<(), ModelError> {
        let parent_label = self.plugin(parent)?.to_string();
        let plugin = self.plugin_mut(child)?;
        let reference = if child == parent {
            ParentRef::Itself
        } else {
            ParentRef::Plugin(parent)
        };
        debug!(
            target: SESSION_TARGET,
            plugin = %plugin,
            parent = parent_label.as_str(),
            "assigning parent"
        );
        plugin.set_parent(reference);
        Ok(())
    }

    /// Appends a direct dependency edge. Duplicates are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownPlugin`] if either key is unknown.
    pub fn add_direct_dependency(
        &mut self,
        id: PluginId,
        dependency: PluginId,
    ) -> Result<(), ModelError> {
        self.plugin(dependency)?;
        self.plugin_mut(id)?.push_direct_dependency(dependency);
        Ok(())
    }

    /// Returns the direct dependencies of a plugin in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownPlugin`] if `id` or any recorded
    /// dependency key is unknown.
    pub fn direct_dependencies(&self, id: PluginId) -> Result<Vec<&Plugin>, ModelError> {
        self.plugin(id)?
            .direct_dependencies()
            .iter()
            .map(|dependency| self.plugin(*dependency))
            .collect()
    }

    /// Records `dependency` in the transitive closure of `id`, keyed by the
    /// dependency's current name.
    ///
    /// The closure holds one plugin per name: a later record for the same
    /// name replaces the earlier one, whose key is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownPlugin`] if either key is unknown.
    pub fn record_recursive_dependency(
        &mut self,
        id: PluginId,
        dependency: PluginId,
    ) -> Result<Option<PluginId>, ModelError> {
        let name = self.plugin(dependency)?.name().to_owned();
        let plugin = self.plugin_mut(id)?;
        let displaced = plugin.insert_recursive_dependency(name, dependency);
        if let Some(previous) = displaced.filter(|previous| *previous != dependency) {
            debug!(
                target: SESSION_TARGET,
                plugin = %plugin,
                replaced = %previous,
                with = %dependency,
                "replacing recursive dependency"
            );
        }
        Ok(displaced)
    }

    /// Returns the resolved transitive dependency named `name`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownPlugin`] if `id` or the recorded key is
    /// unknown.
    pub fn recursive_dependency(
        &self,
        id: PluginId,
        name: &str,
    ) -> Result<Option<&Plugin>, ModelError> {
        self.plugin(id)?
            .recursive_dependencies()
            .get(name)
            .map(|dependency| self.plugin(*dependency))
            .transpose()
    }

    /// Returns the chain of plugins that led to `id` being required.
    ///
    /// The chain starts with `id` and follows parent links until it reaches
    /// a plugin that is its own parent.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownPlugin`] if a key on the chain is
    /// unknown, and [`ModelError::ParentCycle`] if the chain revisits a
    /// plugin or exceeds [`SessionConfig::max_provenance_depth`] links.
    pub fn provenance(&self, id: PluginId) -> Result<Vec<PluginId>, ModelError> {
        let max_depth = self.config.max_provenance_depth();
        let mut chain = vec![id];
        let mut current = id;
        loop {
            let parent = self.parent_of(current)?;
            if parent == current {
                return Ok(chain);
            }
            if chain.len() > max_depth || chain.contains(&parent) {
                let plugin = self.plugin(id)?;
                debug!(
                    target: SESSION_TARGET,
                    plugin = %plugin,
                    depth = chain.len(),
                    max_depth,
                    "parent chain does not terminate"
                );
                return Err(ModelError::ParentCycle {
                    plugin: plugin.name().to_owned(),
                    depth: chain.len(),
                });
            }
            chain.push(parent);
            current = parent;
        }
    }

    /// Renders the provenance chain for diagnostics, e.g.
    /// `"git 4.11.0 <- workflow-aggregator 2.6"`.
    ///
    /// # Errors
    ///
    /// Propagates the errors of [`PluginSession::provenance`].
    pub fn describe_provenance(&self, id: PluginId) -> Result<String, ModelError> {
        let labels = self
            .provenance(id)?
            .into_iter()
            .map(|link| self.plugin(link).map(ToString::to_string))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(labels.join(" <- "))
    }
}

#[cfg(test)]
mod tests;
