// tests/integration_overrides.rs - Override cascade and routing from disk
use reviewgate_core::config::{Catalog, OverrideStore};
use reviewgate_core::engine::{Router, Signal};
use reviewgate_core::types::{Automatable, Severity};
use std::fs;
use tempfile::TempDir;

fn temp() -> TempDir {
    tempfile::tempdir().unwrap()
}

fn write(d: &TempDir, path: &str, content: &str) {
    let full = d.path().join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

fn store(d: &TempDir) -> OverrideStore {
    OverrideStore::new(d.path())
}

#[test]
fn test_later_layers_win_per_key() {
    let d = temp();
    write(&d, "MASTER.md", "## C-DEP-01\nseverity: INFO\nautomatable: NO\n");
    write(&d, "stacks/next.md", "## C-DEP-01\nseverity: RECOMMENDATION\n");
    write(&d, "packages/web.md", "## C-DEP-01\n- **severity**: BLOCKER\n");

    let resolved = store(&d).resolve(Some("next"), &["web".to_string()], &[]);

    assert_eq!(resolved.severity("C-DEP-01"), Some(Severity::Blocker));
    assert_eq!(resolved.automatable("C-DEP-01"), Some(Automatable::No));
}

#[test]
fn test_path_layer_beats_package_layer() {
    let d = temp();
    write(&d, "packages/web.md", "## C-PURE-01\nseverity: BLOCKER\n");
    write(&d, "paths/src_domain_order.ts.md", "## C-PURE-01\nseverity: INFO\n");

    let resolved = store(&d).resolve(None, &["web".to_string()], &["src/domain/order.ts".to_string()]);

    assert_eq!(resolved.severity("C-PURE-01"), Some(Severity::Info));
}

#[test]
fn test_unselected_layers_are_ignored() {
    let d = temp();
    write(&d, "stacks/rails.md", "## C-DEP-01\nseverity: INFO\n");

    let resolved = store(&d).resolve(Some("next"), &[], &[]);

    assert!(resolved.is_empty());
}

#[test]
fn test_missing_store_resolves_empty() {
    let resolved = OverrideStore::new("/nonexistent/review-system").resolve(Some("next"), &[], &[]);
    assert!(resolved.is_empty());
}

#[test]
fn test_router_applies_overrides_to_selected_checks() {
    let d = temp();
    write(&d, "MASTER.md", "# Overrides\n\n## C-DEP-01\nseverity: INFO\n\n## Notes\nseverity: BLOCKER\n");
    let resolved = store(&d).resolve(None, &[], &[]);
    let catalog = Catalog::builtin();

    let routing = Router::new(&catalog, &resolved).route(&[Signal::CircularDependency { cycles: 1 }]);

    assert!(routing.triggered_domains.contains("dependencies"));
    assert_eq!(routing.selected_checks.len(), 1);
    assert_eq!(routing.selected_checks[0].id, "C-DEP-01");
    assert_eq!(routing.selected_checks[0].severity, Severity::Info);
    assert_eq!(routing.reasoning_applied, vec!["circular_dependency"]);
}
