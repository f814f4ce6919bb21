//! Crate-level integration and BDD tests.

use crate::config::{DEFAULT_MAX_PROVENANCE_DEPTH, SessionConfig};
use crate::plugin::Plugin;
use crate::session::PluginSession;
use crate::security::{SecurityVersion, SecurityWarning};


#[test]
fn default_config_has_expected_values() {
    let config = SessionConfig::default();
    assert_eq!(config.max_provenance_depth(), DEFAULT_MAX_PROVENANCE_DEPTH);
    assert_eq!(config, SessionConfig::new(1024));
}

#[test]
fn custom_config_reaches_session() {
    let session = PluginSession::with_config(SessionConfig::new(8));
    assert_eq!(session.config().max_provenance_depth(), 8);
}

#[test]
fn end_to_end_install_set() {
    let mut session = PluginSession::new();
    let requested = session.insert(Plugin::new("configuration-as-code", "").expect("valid"));
    let mut git_plugin = Plugin::new("git", "4.2.2")
        .expect("valid")
        .with_group_id("org.jenkins-ci.plugins");
    git_plugin.set_optional(true);
    git_plugin.set_jenkins_version("2.263.1").expect("valid");
    git_plugin.set_security_warnings(vec![
        SecurityWarning::new("SECURITY-2478", "Missing permission check").with_versions(vec![
            SecurityVersion::new(None, Some(r"4\.[0-9](\..*)?")).expect("valid"),
        ]),
    ]);
    let git = session.insert(git_plugin);

    session.add_direct_dependency(requested, git).expect("edge");
    session.set_parent(git, requested).expect("parent");
    session
        .record_recursive_dependency(requested, git)
        .expect("record");

    let root = session.plugin(requested).expect("known");
    assert!(root.is_latest());
    assert_eq!(root.to_string(), "configuration-as-code latest");

    let dependency = session
        .recursive_dependency(requested, "git")
        .expect("lookup")
        .expect("recorded");
    assert!(dependency.is_optional());
    assert_eq!(dependency.archive_file_name(), "git.jpi");
    assert_eq!(dependency.active_security_warnings().count(), 1);
    assert_eq!(
        session.describe_provenance(git).expect("chain"),
        "git 4.2.2 <- configuration-as-code latest"
    );
}
