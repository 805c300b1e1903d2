use slice_core::model::{is_infrastructure_marker, requires_overhead, DependencySet, ScriptFamily};
use slice_core::version;

#[test]
fn version_is_non_empty() {
    let v = version();
    assert!(!v.is_empty());
}

#[test]
fn infrastructure_markers_are_matched_exactly() {
    for name in ["New-InMemoryModule", "func", "Add-Win32Type", "psenum", "struct"] {
        assert!(is_infrastructure_marker(name), "{name} should be a marker");
    }
    assert!(!is_infrastructure_marker("Func"));
    assert!(!is_infrastructure_marker("Get-NetDomain"));
}

#[test]
fn requires_overhead_only_when_a_marker_is_resolved() {
    let mut deps: DependencySet = ["Get-NetDomain", "Get-NetUser"].iter().map(|s| s.to_string()).collect();
    assert!(!requires_overhead(&deps));
    deps.insert("psenum".into());
    assert!(requires_overhead(&deps));
}

#[test]
fn script_family_is_detected_from_header() {
    assert_eq!(ScriptFamily::detect("<#\nPowerUp aims to be a clearinghouse\n#>"), ScriptFamily::PowerUp);
    assert_eq!(ScriptFamily::detect("<#\nPowerView v2\n#>"), ScriptFamily::PowerView);

    // Marker past the first 100 characters does not count.
    let late = format!("{}PowerUp", "x".repeat(150));
    assert_eq!(ScriptFamily::detect(&late), ScriptFamily::PowerView);
    assert_eq!(ScriptFamily::detect(""), ScriptFamily::PowerView);
}
