use slice_core::diagnostics::Diagnostic;
use slice_core::model::ScriptFamily;
use slice_core::services::overhead::extract_overhead;

const POWERVIEW_TAIL: &str = r#"
$Mod = New-InMemoryModule -ModuleName Win32

# the function table
$FunctionDefinitions = @(
    (func netapi32 NetApiBufferFree ([Int]) @([IntPtr]))
)

$Types = $FunctionDefinitions | Add-Win32Type -Module $Mod -Namespace 'Win32'
$Netapi32 = $Types['netapi32']
$Wtsapi32 = $Types['wtsapi32']
"#;

const POWERUP_TAIL: &str = r#"
$Module = New-InMemoryModule -ModuleName PowerUpModule

$FunctionDefinitions = @(
    (func kernel32 GetCurrentProcess ([IntPtr]) @())
)
$Types = $FunctionDefinitions | Add-Win32Type -Module $Module -Namespace 'PowerUp.NativeMethods'
$Kernel32 = $Types['kernel32']
"#;

fn powerview_script() -> String {
    format!("<#\nPowerView v2.0\n#>\n\nfunction Get-NetDomain {{\n    'domain'\n}}\n{POWERVIEW_TAIL}")
}

#[test]
fn powerview_block_is_extracted_and_normalized() {
    let mut diags: Vec<Diagnostic> = Vec::new();
    let overhead = extract_overhead(&powerview_script(), &mut diags);

    assert_eq!(
        overhead,
        concat!(
            "$Mod = New-InMemoryModule -ModuleName Win32\n",
            "$FunctionDefinitions = @(\n",
            "    (func netapi32 NetApiBufferFree ([Int]) @([IntPtr]))\n",
            ")\n",
            "$Types = $FunctionDefinitions | Add-Win32Type -Module $Mod -Namespace 'Win32'\n",
            "$Netapi32 = $Types['netapi32']\n",
            "$Wtsapi32 = $Types['wtsapi32']",
        )
    );
    assert!(diags.is_empty());
}

#[test]
fn powerup_header_selects_the_powerup_anchors() {
    let script = format!("<#\nPowerUp aims to be a clearinghouse\n#>\n{POWERUP_TAIL}");
    assert_eq!(ScriptFamily::detect(&script), ScriptFamily::PowerUp);

    let mut diags: Vec<Diagnostic> = Vec::new();
    let overhead = extract_overhead(&script, &mut diags);
    assert!(overhead.starts_with("$Module = New-InMemoryModule -ModuleName PowerUpModule\n"));
    assert!(overhead.ends_with("$Kernel32 = $Types['kernel32']"));
    assert!(diags.is_empty());
}

#[test]
fn span_runs_to_the_last_closing_anchor() {
    let script = format!("{}\n$Later = $Types['wtsapi32']\n", powerview_script());
    let mut diags: Vec<Diagnostic> = Vec::new();
    let overhead = extract_overhead(&script, &mut diags);
    assert!(overhead.ends_with("$Later = $Types['wtsapi32']"));
}

#[test]
fn missing_anchors_report_and_yield_nothing() {
    let mut diags: Vec<Diagnostic> = Vec::new();
    let overhead = extract_overhead("function Foo {\n    'x'\n}\n", &mut diags);
    assert_eq!(overhead, "");
    assert_eq!(diags, vec![Diagnostic::OverheadNotFound { family: ScriptFamily::PowerView }]);
}

#[test]
fn powerup_script_does_not_fall_back_to_powerview_anchors() {
    let script = format!("# PowerUp\n{POWERVIEW_TAIL}");
    let mut diags: Vec<Diagnostic> = Vec::new();
    assert_eq!(extract_overhead(&script, &mut diags), "");
    assert_eq!(diags, vec![Diagnostic::OverheadNotFound { family: ScriptFamily::PowerUp }]);
}

#[test]
fn opening_anchor_must_start_a_line() {
    let script = "$x = 1; $Mod = New-InMemoryModule\n$Wtsapi32 = $Types['wtsapi32']\n";
    let mut diags: Vec<Diagnostic> = Vec::new();
    assert_eq!(extract_overhead(script, &mut diags), "");
    assert_eq!(diags.len(), 1);
}
