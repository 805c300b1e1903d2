use slice_core::diagnostics::Diagnostic;
use slice_core::model::{DependencySet, FunctionMap, ScriptFamily, INFRASTRUCTURE_MARKERS};
use slice_core::services::slicing::{assemble, slice_script, SliceRequest};

const SIMPLE: &str = "function Foo {\n    Bar -Name 'x'\n}\n\nfunction Bar {\n    'hello'\n}\n";

const OVERHEAD_TAIL: &str = r#"
$Mod = New-InMemoryModule -ModuleName Win32
$FunctionDefinitions = @(
    (func wtsapi32 WTSOpenServerEx ([IntPtr]) @([String]))
)
$Types = $FunctionDefinitions | Add-Win32Type -Module $Mod -Namespace 'Win32'
$Wtsapi32 = $Types['wtsapi32']
"#;

const SESSIONS: &str = "function Get-Sessions {\n    $Wtsapi32::WTSOpenServerEx($Host)\n}\n";

fn misses_for_markers() -> Vec<Diagnostic> {
    INFRASTRUCTURE_MARKERS
        .iter()
        .map(|name| Diagnostic::ExtractionMiss { name: name.to_string() })
        .collect()
}

#[test]
fn slices_entry_and_its_dependency_without_overhead() {
    let mut diags: Vec<Diagnostic> = Vec::new();
    let outcome = slice_script(SIMPLE, &SliceRequest::single("Foo"), &mut diags);

    assert_eq!(
        outcome.script,
        "function Foo {\n    Bar -Name 'x'\n}\nfunction Bar {\n    'hello'\n}\n\n"
    );
    assert_eq!(outcome.dependencies.iter().collect::<Vec<_>>(), vec!["Foo", "Bar"]);
    assert_eq!(outcome.extracted_functions, 2);
    assert!(!outcome.overhead_required);
    assert!(!outcome.overhead_included);
    assert!(diags.is_empty());
}

#[test]
fn native_module_use_appends_overhead_once() {
    let script = format!("<#\nPowerView\n#>\n\n{SESSIONS}{OVERHEAD_TAIL}");
    let mut diags: Vec<Diagnostic> = Vec::new();
    let outcome = slice_script(&script, &SliceRequest::single("Get-Sessions"), &mut diags);

    assert!(outcome.overhead_required);
    assert!(outcome.overhead_included);
    for marker in INFRASTRUCTURE_MARKERS {
        assert!(outcome.dependencies.contains(marker), "{marker} not resolved");
    }
    assert!(outcome.script.starts_with(
        "function Get-Sessions {\n    $Wtsapi32::WTSOpenServerEx($Host)\n}\n$Mod = New-InMemoryModule"
    ));
    assert!(outcome.script.ends_with("$Wtsapi32 = $Types['wtsapi32']\n"));
    assert_eq!(outcome.script.matches("$Mod = New-InMemoryModule").count(), 1);
    // The markers are not defined in this script, so each is a miss.
    assert_eq!(diags, misses_for_markers());
}

#[test]
fn unknown_entry_yields_empty_output_and_one_miss() {
    let mut diags: Vec<Diagnostic> = Vec::new();
    let outcome = slice_script(SIMPLE, &SliceRequest::single("Missing"), &mut diags);

    assert_eq!(outcome.script, "");
    assert_eq!(outcome.dependencies.iter().collect::<Vec<_>>(), vec!["Missing"]);
    assert_eq!(diags, vec![Diagnostic::ExtractionMiss { name: "Missing".into() }]);
}

#[test]
fn duplicate_definitions_slice_the_last_body() {
    let script = "function Foo {\n    'first'\n}\n\nfunction Foo {\n    'second'\n}\n";
    let mut diags: Vec<Diagnostic> = Vec::new();
    let outcome = slice_script(script, &SliceRequest::single("Foo"), &mut diags);

    assert_eq!(outcome.script, "function Foo {\n    'second'\n}\n\n");
    assert_eq!(diags, vec![Diagnostic::DuplicateDefinition { name: "Foo".into() }]);
}

#[test]
fn overhead_is_skipped_when_no_marker_is_resolved() {
    let script = format!("{SIMPLE}{OVERHEAD_TAIL}");
    let mut diags: Vec<Diagnostic> = Vec::new();
    let outcome = slice_script(&script, &SliceRequest::single("Foo"), &mut diags);

    assert!(!outcome.script.contains("New-InMemoryModule"));
    assert!(!outcome.overhead_required);
    assert!(diags.is_empty());
}

#[test]
fn missing_overhead_block_degrades_to_functions_only() {
    let mut diags: Vec<Diagnostic> = Vec::new();
    let outcome = slice_script(SESSIONS, &SliceRequest::single("Get-Sessions"), &mut diags);

    assert_eq!(outcome.script, "function Get-Sessions {\n    $Wtsapi32::WTSOpenServerEx($Host)\n}\n\n");
    assert!(outcome.overhead_required);
    assert!(!outcome.overhead_included);

    let mut expected = misses_for_markers();
    expected.push(Diagnostic::OverheadNotFound { family: ScriptFamily::PowerView });
    assert_eq!(diags, expected);
}

#[test]
fn shared_dependencies_are_emitted_once() {
    let script = concat!(
        "function Get-A {\n    Get-Shared\n}\n\n",
        "function Get-B {\n    Get-Shared\n    Get-A\n}\n\n",
        "function Get-Shared {\n    'shared'\n}\n",
    );
    let mut diags: Vec<Diagnostic> = Vec::new();
    let outcome = slice_script(script, &SliceRequest::new(["Get-A", "Get-B"]), &mut diags);

    assert_eq!(outcome.script.matches("function Get-Shared {").count(), 1);
    assert_eq!(outcome.script.matches("function Get-A {").count(), 1);
    assert_eq!(
        outcome.dependencies.iter().collect::<Vec<_>>(),
        vec!["Get-A", "Get-Shared", "Get-B"]
    );
}

#[test]
fn empty_script_produces_empty_output() {
    let mut diags: Vec<Diagnostic> = Vec::new();
    let outcome = slice_script("", &SliceRequest::single("Foo"), &mut diags);

    assert_eq!(outcome.script, "");
    assert_eq!(outcome.extracted_functions, 0);
    assert_eq!(diags, vec![Diagnostic::ExtractionMiss { name: "Foo".into() }]);
}

#[test]
fn step_ceiling_is_forwarded_to_resolution() {
    let mut diags: Vec<Diagnostic> = Vec::new();
    let request = SliceRequest::single("Foo").with_max_steps(Some(1));
    let outcome = slice_script(SIMPLE, &request, &mut diags);

    // Bar is discovered on the first step, so it is still emitted.
    assert_eq!(outcome.dependencies.len(), 2);
    assert_eq!(diags, vec![Diagnostic::ResolutionLimit { limit: 1 }]);
}

#[test]
fn assemble_follows_dependency_order() {
    let functions: FunctionMap = [
        ("A".to_string(), "function A {\n}".to_string()),
        ("B".to_string(), "function B {\n}".to_string()),
    ]
    .into_iter()
    .collect();
    let deps: DependencySet = ["B", "A"].iter().map(|s| s.to_string()).collect();

    let mut diags: Vec<Diagnostic> = Vec::new();
    let script = assemble(&functions, &deps, "", &mut diags);
    assert_eq!(script, "function B {\n}\nfunction A {\n}\n\n");
    assert!(diags.is_empty());

    let empty = assemble(&functions, &DependencySet::new(), "", &mut diags);
    assert_eq!(empty, "");
}
