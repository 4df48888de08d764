use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn tinybel(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_tinybel"))
        .args(args)
        .env_remove("BEL_TRACE")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to start tinybel");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

/// A source file unique to this test process.
fn source_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("tinybel-{}-{}.bel", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn piped_program_prints_its_value() {
    let out = tinybel(&[], "(+ 1 2 3 4 5)");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "15\n");
}

#[test]
fn piped_program_prints_only_the_last_value() {
    let out = tinybel(&[], "(set x 1)\n(+ x 6)\n");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "7\n");
}

#[test]
fn piped_program_stops_at_the_first_error() {
    let out = tinybel(&[], "(car nope) 1");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("unbound variable 'nope'"), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "");
}

#[test]
fn empty_piped_input_prints_nothing() {
    let out = tinybel(&[], "  \n");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "");
}

#[test]
fn loaded_definitions_are_visible_to_stdin() {
    let lib = source_file("double", "(define double (x) (+ x x))");
    let out = tinybel(&["--load", lib.to_str().unwrap()], "(double 21)");
    std::fs::remove_file(&lib).ok();

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "42\n");
}

#[test]
fn a_failing_load_stops_before_stdin_is_read() {
    let lib = source_file("broken", "(set a 1) (car nope) (set b 2)");
    let out = tinybel(&["--load", lib.to_str().unwrap()], "(+ 1 1)");
    std::fs::remove_file(&lib).ok();

    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.contains("Error evaluating"), "stderr: {}", err);
    assert!(err.contains("unbound variable 'nope'"), "stderr: {}", err);
    assert_eq!(stdout(&out), "");
}

#[test]
fn repl_reports_errors_and_keeps_going() {
    let out = tinybel(&["--interactive"], "(car nope)\n(+ 1 2)\n");
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stderr(&out).contains("unbound variable 'nope'"));

    let printed = stdout(&out);
    assert!(printed.contains("3\n"), "stdout: {}", printed);
    assert!(printed.trim_end().ends_with("Have a nice day!"), "stdout: {}", printed);
}

#[test]
fn repl_waits_for_balanced_parens_ignoring_literals() {
    let out = tinybel(&["--interactive"], "(car \"(a\")\n(cons \\( (+\n 1\n 2))\n");
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let printed = stdout(&out);
    assert!(printed.contains(r"\("), "stdout: {}", printed);
    assert!(printed.contains(r"(\( . 3)"), "stdout: {}", printed);
}

#[test]
fn list_printing_flag() {
    let out = tinybel(&["--no-strings"], "\"ab\"");
    assert_eq!(stdout(&out), "(\\a \\b)\n");
}
