//! Unit tests for the plugin session arena.

use camino::Utf8PathBuf;
use rstest::{fixture, rstest};

use super::*;

fn plugin(name: &str, version: &str) -> Plugin {
    Plugin::new(name, version).expect("valid plugin")
}

/// A small dependency tree:
///
/// ```text
/// workflow-aggregator
/// ├── git
/// │   └── credentials 2.3.0
/// └── credentials 2.6.1
/// ```
struct Tree {
    session: PluginSession,
    root: PluginId,
    git: PluginId,
    old_credentials: PluginId,
    new_credentials: PluginId,
}

#[fixture]
fn tree() -> Tree {
    let mut session = PluginSession::new();
    let root = session.insert(plugin("workflow-aggregator", "2.6"));
    let git = session.insert(plugin("git", "4.11.0"));
    let old_credentials = session.insert(plugin("credentials", "2.3.0"));
    let new_credentials = session.insert(plugin("credentials", "2.6.1"));

    session.add_direct_dependency(root, git).expect("edge");
    session
        .add_direct_dependency(root, new_credentials)
        .expect("edge");
    session
        .add_direct_dependency(git, old_credentials)
        .expect("edge");
    session.set_parent(git, root).expect("parent");
    session.set_parent(new_credentials, root).expect("parent");
    session.set_parent(old_credentials, git).expect("parent");

    Tree {
        session,
        root,
        git,
        old_credentials,
        new_credentials,
    }
}

fn foreign_id() -> PluginId {
    let mut other = PluginSession::new();
    for name in ["a", "b", "c", "d", "e", "f", "g", "h"] {
        other.insert(plugin(name, "1.0"));
    }
    other.insert(plugin("stranger", "1.0"))
}

// ---------------------------------------------------------------------------
// Construction and lookup
// ---------------------------------------------------------------------------

#[test]
fn new_session_is_empty() {
    let session = PluginSession::new();
    assert!(session.is_empty());
    assert_eq!(session.len(), 0);
    assert_eq!(session.config(), &SessionConfig::default());
}

#[test]
fn insert_hands_out_sequential_ids() {
    let mut session = PluginSession::new();
    let first = session.insert(plugin("git", "1.0"));
    let second = session.insert(plugin("git", "1.0"));
    assert_eq!(first.index(), 0);
    assert_eq!(second.index(), 1);
    assert_ne!(first, second);
    assert_eq!(session.len(), 2);
    assert_eq!(second.to_string(), "#1");
}

#[rstest]
fn get_returns_inserted_plugin(tree: Tree) {
    let git = tree.session.get(tree.git).expect("git present");
    assert_eq!(git.name(), "git");
    assert!(tree.session.get(foreign_id()).is_none());
}

#[rstest]
fn plugin_reports_unknown_id(tree: Tree) {
    let id = foreign_id();
    let err = tree.session.plugin(id).expect_err("unknown id");
    assert!(matches!(err, ModelError::UnknownPlugin { id: missing } if missing == id));
}

#[rstest]
fn mutation_is_visible_through_every_edge(mut tree: Tree) {
    let shared = tree.new_credentials;
    tree.session
        .record_recursive_dependency(tree.git, shared)
        .expect("record");
    tree.session
        .plugin_mut(shared)
        .expect("present")
        .set_file(Some(Utf8PathBuf::from("/plugins/credentials.jpi")));

    let via_direct = tree
        .session
        .direct_dependencies(tree.root)
        .expect("deps")
        .into_iter()
        .find(|p| p.name() == "credentials")
        .and_then(Plugin::file)
        .map(ToString::to_string);
    let via_closure = tree
        .session
        .recursive_dependency(tree.git, "credentials")
        .expect("lookup")
        .and_then(Plugin::file)
        .map(ToString::to_string);

    assert_eq!(via_direct.as_deref(), Some("/plugins/credentials.jpi"));
    assert_eq!(via_closure, via_direct);
}

#[rstest]
fn find_by_name_returns_every_version(tree: Tree) {
    let versions: Vec<&str> = tree
        .session
        .find_by_name("credentials")
        .map(|(_, p)| p.version().as_str())
        .collect();
    assert_eq!(versions, ["2.3.0", "2.6.1"]);
    assert_eq!(tree.session.find_by_name("docker").count(), 0);
}

#[rstest]
fn iter_follows_insertion_order(tree: Tree) {
    let ids: Vec<PluginId> = tree.session.iter().map(|(id, _)| id).collect();
    assert_eq!(
        ids,
        [tree.root, tree.git, tree.old_credentials, tree.new_credentials]
    );
}

// ---------------------------------------------------------------------------
// Parent links
// ---------------------------------------------------------------------------

#[test]
fn fresh_plugin_is_its_own_parent() {
    let mut session = PluginSession::new();
    let id = session.insert(plugin("git", "1.0"));
    assert_eq!(session.parent_of(id).expect("known"), id);
    assert_eq!(session.plugin(id).expect("known").parent(), ParentRef::Itself);
}

#[rstest]
fn set_parent_links_child(tree: Tree) {
    assert_eq!(tree.session.parent_of(tree.git).expect("known"), tree.root);
    assert_eq!(
        tree.session.plugin(tree.git).expect("known").parent(),
        ParentRef::Plugin(tree.root)
    );
}

#[rstest]
fn set_parent_to_self_resets(mut tree: Tree) {
    tree.session.set_parent(tree.git, tree.git).expect("reset");
    assert_eq!(
        tree.session.plugin(tree.git).expect("known").parent(),
        ParentRef::Itself
    );
    assert_eq!(tree.session.parent_of(tree.git).expect("known"), tree.git);
}

#[rstest]
fn set_parent_rejects_unknown_ids(mut tree: Tree) {
    let stranger = foreign_id();
    let err = tree
        .session
        .set_parent(tree.git, stranger)
        .expect_err("unknown parent");
    assert!(matches!(err, ModelError::UnknownPlugin { .. }));
    assert_eq!(tree.session.parent_of(tree.git).expect("known"), tree.root);

    let child_err = tree
        .session
        .set_parent(stranger, tree.root)
        .expect_err("unknown child");
    assert!(matches!(child_err, ModelError::UnknownPlugin { .. }));
}

// ---------------------------------------------------------------------------
// Dependency edges
// ---------------------------------------------------------------------------

#[rstest]
fn direct_dependencies_keep_order_and_duplicates(mut tree: Tree) {
    tree.session
        .add_direct_dependency(tree.root, tree.git)
        .expect("duplicate edge");
    let names: Vec<String> = tree
        .session
        .direct_dependencies(tree.root)
        .expect("deps")
        .into_iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(names, ["git 4.11.0", "credentials 2.6.1", "git 4.11.0"]);
}

#[rstest]
fn add_direct_dependency_rejects_unknown(mut tree: Tree) {
    let err = tree
        .session
        .add_direct_dependency(tree.root, foreign_id())
        .expect_err("unknown dependency");
    assert!(matches!(err, ModelError::UnknownPlugin { .. }));
    assert_eq!(
        tree.session
            .plugin(tree.root)
            .expect("known")
            .direct_dependencies()
            .len(),
        2
    );
}

#[rstest]
fn direct_dependencies_report_dangling_edges(mut tree: Tree) {
    tree.session
        .plugin_mut(tree.git)
        .expect("known")
        .set_direct_dependencies(vec![foreign_id()]);
    let err = tree
        .session
        .direct_dependencies(tree.git)
        .expect_err("dangling edge");
    assert!(matches!(err, ModelError::UnknownPlugin { .. }));
}

#[rstest]
fn recursive_dependencies_collapse_by_name(mut tree: Tree) {
    let first = tree
        .session
        .record_recursive_dependency(tree.root, tree.old_credentials)
        .expect("record");
    assert_eq!(first, None);

    let second = tree
        .session
        .record_recursive_dependency(tree.root, tree.new_credentials)
        .expect("record");
    assert_eq!(second, Some(tree.old_credentials));

    let closure = tree
        .session
        .plugin(tree.root)
        .expect("known")
        .recursive_dependencies();
    assert_eq!(closure.len(), 1);
    assert_eq!(closure.get("credentials"), Some(&tree.new_credentials));

    let resolved = tree
        .session
        .recursive_dependency(tree.root, "credentials")
        .expect("lookup")
        .expect("recorded");
    assert_eq!(resolved.version().as_str(), "2.6.1");
}

#[rstest]
fn recursive_dependency_uses_current_name(mut tree: Tree) {
    tree.session
        .plugin_mut(tree.git)
        .expect("known")
        .set_name("git-client");
    tree.session
        .record_recursive_dependency(tree.root, tree.git)
        .expect("record");
    assert!(
        tree.session
            .recursive_dependency(tree.root, "git")
            .expect("lookup")
            .is_none()
    );
    assert!(
        tree.session
            .recursive_dependency(tree.root, "git-client")
            .expect("lookup")
            .is_some()
    );
}

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

#[rstest]
fn provenance_walks_to_root(tree: Tree) {
    let chain = tree
        .session
        .provenance(tree.old_credentials)
        .expect("chain");
    assert_eq!(chain, [tree.old_credentials, tree.git, tree.root]);
    assert_eq!(
        tree.session.provenance(tree.root).expect("chain"),
        [tree.root]
    );
}

#[rstest]
fn describe_provenance_renders_chain(tree: Tree) {
    let rendered = tree
        .session
        .describe_provenance(tree.old_credentials)
        .expect("chain");
    assert_eq!(
        rendered,
        "credentials 2.3.0 <- git 4.11.0 <- workflow-aggregator 2.6"
    );
}

#[rstest]
fn provenance_detects_cycles(mut tree: Tree) {
    tree.session.set_parent(tree.root, tree.old_credentials).expect("cycle");
    let err = tree.session.provenance(tree.git).expect_err("cycle");
    match err {
        ModelError::ParentCycle { plugin, depth } => {
            assert_eq!(plugin, "git");
            assert_eq!(depth, 3);
        }
        other => panic!("expected ParentCycle, got: {other}"),
    }
}

#[rstest]
#[case::within_limit(2, true)]
#[case::beyond_limit(1, false)]
fn provenance_respects_depth_limit(#[case] max_depth: usize, #[case] succeeds: bool) {
    let mut session = PluginSession::with_config(SessionConfig::new(max_depth));
    let root = session.insert(plugin("root", "1.0"));
    let middle = session.insert(plugin("middle", "1.0"));
    let leaf = session.insert(plugin("leaf", "1.0"));
    session.set_parent(middle, root).expect("parent");
    session.set_parent(leaf, middle).expect("parent");

    let result = session.provenance(leaf);
    assert_eq!(result.is_ok(), succeeds, "max depth {max_depth}: {result:?}");
}
