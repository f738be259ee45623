use std::io::Write as _;

use assert_cmd::Command;
use tempfile::NamedTempFile;

/// Writes `source` to a temporary `.lox` file and runs the `lox` binary
/// on it, asserting a clean exit and exactly `expected_stdout`.
///
/// The fixture lives only for the duration of the call (SPEC_FULL.md's
/// ambient test tooling section: `tempfile` backs on-disk `.lox`
/// fixtures instead of committing fixture files whose source text can
/// drift from the assertions next to them).
pub fn assert_stdout(source: &str, expected_stdout: &str) {
    let mut file = NamedTempFile::with_suffix(".lox").expect("create temp fixture");
    file.write_all(source.as_bytes()).expect("write temp fixture");

    Command::cargo_bin("lox")
        .expect("find the lox binary")
        .arg(file.path())
        .assert()
        .success()
        .stdout(expected_stdout.to_string());
}

/// Same, but asserts the process exits with `exit_code` and stderr is
/// exactly `expected_stderr` (spec.md §6's error format: `[line N]
/// Error<where>: <message>` for syntax errors, `<message>\n[line N]`
/// for runtime errors).
pub fn assert_failure(source: &str, exit_code: i32, expected_stderr: &str) {
    let mut file = NamedTempFile::with_suffix(".lox").expect("create temp fixture");
    file.write_all(source.as_bytes()).expect("write temp fixture");

    Command::cargo_bin("lox")
        .expect("find the lox binary")
        .arg(file.path())
        .assert()
        .code(exit_code)
        .stderr(expected_stderr.to_string());
}
