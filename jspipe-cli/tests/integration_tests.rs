//! Integration tests for the jspipe CLI
//!
//! Drives the binary end to end. The Node tools are replaced by small shell
//! scripts in a temporary `node_modules/.bin`, so these tests are unix-only
//! and need no Node installation.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

const SAMPLE_SOURCE: &str = "const x = 1; console.log(x);\n";

/// Get the path to the jspipe binary (built by cargo)
fn jspipe_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_jspipe"))
}

/// Run jspipe with the given args in the specified directory
fn run_jspipe(dir: &Path, args: &[&str]) -> Output {
    jspipe_binary()
        .current_dir(dir)
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute jspipe")
}

/// Get stdout as string
fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as string
fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn bin_dir(root: &Path) -> PathBuf {
    root.join("node_modules").join(".bin")
}

/// Install an executable shell script as a fake tool
fn install_tool(root: &Path, name: &str, script: &str) -> PathBuf {
    let dir = bin_dir(root);
    fs::create_dir_all(&dir).expect("Failed to create node_modules/.bin");
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", script)).expect("Failed to write tool");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to mark tool executable");
    path
}

/// Fake Babel: rewrites `const` to `var`, records its arguments
fn install_babel(root: &Path) {
    install_tool(
        root,
        "babel",
        r#"printf '%s\n' "$@" > "$(dirname "$0")/babel.args"
sed 's/const /var /g'"#,
    );
}

/// Fake Terser: squeezes the whitespace around `=` and `;`
fn install_terser(root: &Path) {
    install_tool(root, "terser", "sed 's/ = /=/g; s/; /;/g'");
}

/// Fake esbuild: wraps stdin in an IIFE, records arguments and working directory
fn install_esbuild(root: &Path) {
    install_tool(
        root,
        "esbuild",
        r#"printf '%s\n' "$@" > "$(dirname "$0")/esbuild.args"
pwd -P > "$(dirname "$0")/esbuild.cwd"
printf '(()=>{'
cat
printf '})();\n'"#,
    );
}

fn install_all_tools(root: &Path) {
    install_babel(root);
    install_terser(root);
    install_esbuild(root);
}

fn recorded(root: &Path, file: &str) -> String {
    fs::read_to_string(bin_dir(root).join(file)).unwrap_or_default()
}

/// Create a project with `app.js` and return its path
fn setup_project(dir: &Path) -> PathBuf {
    let path = dir.join("app.js");
    fs::write(&path, SAMPLE_SOURCE).expect("Failed to write app.js");
    path
}

// ============================================================================
// Usage Tests
// ============================================================================

#[test]
fn test_no_input_exits_with_code_1() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_jspipe(temp_dir.path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("Please specify a JavaScript file"),
        "got: {}",
        stderr(&output)
    );
    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_only_flags_is_usage_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_jspipe(temp_dir.path(), &["--babel", "false", "--terser", "false"]);

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_repeated_toggle_is_accepted() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_project(temp_dir.path());

    // No tools installed: the run only succeeds if the last --babel wins.
    let output = run_jspipe(
        temp_dir.path(),
        &[
            "app.js", "--babel", "true", "--babel", "false", "--terser", "false", "--esbuild",
            "false",
        ],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let written = fs::read_to_string(temp_dir.path().join("app.bundle.min.js")).unwrap();
    assert_eq!(written, SAMPLE_SOURCE);
}

#[test]
fn test_help() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_jspipe(temp_dir.path(), &["--help"]);

    assert!(output.status.success());
    let help = stdout(&output);
    for flag in ["--output", "--babel", "--terser", "--esbuild"] {
        assert!(help.contains(flag), "help should mention {}", flag);
    }
}

// ============================================================================
// Pipeline Tests
// ============================================================================

#[test]
fn test_missing_input_file_reports_read_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let output = run_jspipe(temp_dir.path(), &["missing.js"]);

    assert!(!output.status.success(), "aborted run must fail");
    assert!(
        stderr(&output).contains("FileReadError"),
        "got: {}",
        stderr(&output)
    );
    assert!(!temp_dir.path().join("missing.bundle.min.js").exists());
}

#[test]
fn test_identity_pipeline_needs_no_tools() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_project(temp_dir.path());

    let output = run_jspipe(
        temp_dir.path(),
        &["app.js", "--babel", "false", "--terser", "false", "--esbuild", "false"],
    );

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let written = fs::read_to_string(temp_dir.path().join("app.bundle.min.js")).unwrap();
    assert_eq!(written, SAMPLE_SOURCE);
}

#[test]
fn test_default_run_applies_all_stages() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_project(temp_dir.path());
    install_all_tools(temp_dir.path());

    let output = run_jspipe(temp_dir.path(), &["app.js"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let written = fs::read_to_string(temp_dir.path().join("app.bundle.min.js")).unwrap();
    assert!(!written.contains("const"), "transpiled: {}", written);
    assert!(written.contains("var x=1;console.log(x);"), "minified: {}", written);
    assert!(written.starts_with("(()=>{"), "bundled: {}", written);

    let babel_args = recorded(temp_dir.path(), "babel.args");
    assert!(babel_args.contains("@babel/preset-env"));

    let esbuild_args = recorded(temp_dir.path(), "esbuild.args");
    assert!(esbuild_args.lines().any(|l| l == "--bundle"));
    assert!(esbuild_args.lines().any(|l| l == "--minify"));

    let esbuild_cwd = recorded(temp_dir.path(), "esbuild.cwd");
    assert_eq!(
        PathBuf::from(esbuild_cwd.trim()),
        temp_dir.path().canonicalize().unwrap(),
        "bundler resolves relative to the input file's directory"
    );
}

#[test]
fn test_progress_lines() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_project(temp_dir.path());
    install_all_tools(temp_dir.path());

    let output = run_jspipe(temp_dir.path(), &["app.js"]);
    let out = stdout(&output);

    let expected = [
        "Reading input file: app.js",
        "Transpiling with Babel...",
        "Transpiling completed.",
        "Minifying with Terser...",
        "Minification completed.",
        "Bundling with esbuild...",
        "Bundling completed.",
        "File optimized successfully. Output: app.bundle.min.js",
    ];
    let mut cursor = 0;
    for line in expected {
        let found = out[cursor..]
            .find(line)
            .unwrap_or_else(|| panic!("missing or out of order: {}\n{}", line, out));
        cursor += found + line.len();
    }
}

#[test]
fn test_quiet_suppresses_progress() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_project(temp_dir.path());
    install_all_tools(temp_dir.path());

    let output = run_jspipe(temp_dir.path(), &["app.js", "--quiet"]);

    assert!(output.status.success());
    assert!(stdout(&output).is_empty(), "got: {}", stdout(&output));
    assert!(temp_dir.path().join("app.bundle.min.js").exists());
}

#[test]
fn test_minify_disabled_skips_bundler_minification() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_project(temp_dir.path());
    install_all_tools(temp_dir.path());

    let output = run_jspipe(temp_dir.path(), &["app.js", "--terser", "false"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let written = fs::read_to_string(temp_dir.path().join("app.bundle.min.js")).unwrap();
    assert!(written.contains("var x = 1; console.log(x);"), "got: {}", written);

    let esbuild_args = recorded(temp_dir.path(), "esbuild.args");
    assert!(esbuild_args.lines().any(|l| l == "--bundle"));
    assert!(!esbuild_args.lines().any(|l| l == "--minify"));
}

#[test]
fn test_explicit_output_and_flag_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_project(temp_dir.path());
    install_all_tools(temp_dir.path());
    fs::create_dir(temp_dir.path().join("dist")).unwrap();

    let output = run_jspipe(
        temp_dir.path(),
        &["--esbuild", "false", "--output", "dist/out.js", "app.js"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let written = fs::read_to_string(temp_dir.path().join("dist").join("out.js")).unwrap();
    assert_eq!(written.trim_end(), "var x=1;console.log(x);");
    assert!(!temp_dir.path().join("app.bundle.min.js").exists());
    assert!(recorded(temp_dir.path(), "esbuild.args").is_empty());
}

#[test]
fn test_input_in_subdirectory() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let src = temp_dir.path().join("src");
    fs::create_dir(&src).unwrap();
    setup_project(&src);
    install_all_tools(temp_dir.path());

    let output = run_jspipe(temp_dir.path(), &["src/app.js"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    // Default output lands in the working directory, not next to the input.
    assert!(temp_dir.path().join("app.bundle.min.js").exists());
    assert!(!src.join("app.bundle.min.js").exists());

    let esbuild_cwd = recorded(temp_dir.path(), "esbuild.cwd");
    assert_eq!(
        PathBuf::from(esbuild_cwd.trim()),
        src.canonicalize().unwrap()
    );
}

#[test]
fn test_stage_failure_writes_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_project(temp_dir.path());
    install_babel(temp_dir.path());
    install_esbuild(temp_dir.path());
    install_tool(
        temp_dir.path(),
        "terser",
        "cat >/dev/null\necho 'Parse error at 0:1' >&2\nexit 1",
    );

    let output = run_jspipe(temp_dir.path(), &["app.js"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("MinifyError"), "got: {}", err);
    assert_eq!(
        err.matches("Parse error at 0:1").count(),
        1,
        "error should be reported once: {}",
        err
    );
    assert!(!temp_dir.path().join("app.bundle.min.js").exists());
    assert!(
        recorded(temp_dir.path(), "esbuild.args").is_empty(),
        "bundler must not run after a failed stage"
    );
}

#[test]
fn test_missing_tool_is_reported() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_project(temp_dir.path());
    let empty_path = temp_dir.path().join("empty-bin");
    fs::create_dir(&empty_path).unwrap();

    let output = jspipe_binary()
        .current_dir(temp_dir.path())
        .args(["app.js", "--terser", "false", "--esbuild", "false"])
        .env("PATH", &empty_path)
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to execute jspipe");

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("TranspileError"), "got: {}", err);
    assert!(err.contains("babel not found"), "got: {}", err);
    assert!(!temp_dir.path().join("app.bundle.min.js").exists());
}

#[test]
fn test_tool_override() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    setup_project(temp_dir.path());
    let tools = temp_dir.path().join("tools");
    fs::create_dir(&tools).unwrap();
    let babel = tools.join("my-babel");
    fs::write(&babel, "#!/bin/sh\nsed 's/console/globalThis.console/'\n").unwrap();
    fs::set_permissions(&babel, fs::Permissions::from_mode(0o755)).unwrap();

    let output = run_jspipe(
        temp_dir.path(),
        &[
            "app.js",
            "--terser",
            "false",
            "--esbuild",
            "false",
            "--babel-bin",
            "tools/my-babel",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let written = fs::read_to_string(temp_dir.path().join("app.bundle.min.js")).unwrap();
    assert!(written.contains("globalThis.console.log(x)"), "got: {}", written);
}
