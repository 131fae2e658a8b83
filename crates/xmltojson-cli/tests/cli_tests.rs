use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("xmltojson").unwrap_or_else(|e| panic!("binary not built: {e}"))
}

#[test]
fn test_stdin_to_stdout() {
    cmd()
        .write_stdin("<root><name>test</name></root>")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"root":{"name":{"$":"test"}}}"#));
}

#[test]
fn test_file_input_and_output() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let input = dir.path().join("in.xml");
    let output = dir.path().join("out.json");
    std::fs::write(&input, "<root><a>1</a></root>").unwrap_or_else(|e| panic!("write: {e}"));

    cmd().arg(&input).arg("-o").arg(&output).assert().success();

    let written = std::fs::read_to_string(&output).unwrap_or_else(|e| panic!("read: {e}"));
    assert_eq!(written, r#"{"root":{"a":{"$":"1"}}}"#);
}

#[test]
fn test_get_path() {
    cmd()
        .args(["--get", "root.name.$"])
        .write_stdin("<root><name>test</name></root>")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"test\""));
}

#[test]
fn test_get_missing_path_fails() {
    cmd()
        .args(["--get", "root.nope"])
        .write_stdin("<root><name>test</name></root>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("resolves to nothing"));
}

#[test]
fn test_find_with_condition() {
    cmd()
        .args(["--find", "root.i", "--where", "n > 1"])
        .write_stdin("<root><i><n>1</n></i><i><n>2</n></i></root>")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"2\""))
        .stdout(predicate::str::contains("\"1\"").not());
}

#[test]
fn test_move_rules_apply_in_order() {
    cmd()
        .args([
            "--move",
            "root.children.item=root.item",
            "--clear-empty-nodes",
        ])
        .write_stdin("<root><children><item>x</item></children></root>")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"item\""))
        .stdout(predicate::str::contains("children").not());
}

#[test]
fn test_detect_types_flag() {
    cmd()
        .arg("--detect-types")
        .write_stdin("<root><n>42</n><b>true</b></root>")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""n":{"$":42}"#))
        .stdout(predicate::str::contains(r#""b":{"$":true}"#));
}

#[test]
fn test_invalid_move_rule_rejected() {
    cmd()
        .args(["--move", "no-separator"])
        .write_stdin("<root/>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid move rule"));
}

#[test]
fn test_malformed_xml_reports_failure() {
    cmd()
        .write_stdin("<root><unclosed>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("conversion failed (500)"));
}

#[test]
fn test_empty_stdin_rejected() {
    cmd()
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no input"));
}
