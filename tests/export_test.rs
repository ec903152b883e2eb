use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_bpel_to_stdout() {
    let mut cmd = Command::new(cargo_bin!("orderflow-sim"));
    cmd.arg("bpel");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("<?xml"))
        .stdout(predicate::str::contains(r#"<process name="OrderProcessing""#))
        .stdout(predicate::str::contains("<compensationHandler>"))
        .stdout(predicate::str::contains("</process>"));
}

#[test]
fn test_bpel_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("order.bpel");

    let mut cmd = Command::new(cargo_bin!("orderflow-sim"));
    cmd.arg("bpel").arg("--out").arg(&path);
    cmd.assert().success().stdout(predicate::str::is_empty());

    let xml = std::fs::read_to_string(&path).unwrap();
    assert!(xml.contains(r#"<reply name="SendResponse""#));
}

#[test]
fn test_vars_out_writes_final_variables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vars.json");

    let mut cmd = Command::new(cargo_bin!("orderflow-sim"));
    cmd.args(["--speed", "200", "--fixed-latency", "20", "run", "happy"])
        .arg("--vars-out")
        .arg(&path);
    cmd.assert().success();

    let vars: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(vars["order"]["customerId"], "C-123");
    assert_eq!(vars["auth"]["approved"], true);
    assert!(vars["auth"]["authId"].as_str().unwrap().starts_with("AUTH_"));
    assert!(vars["inventory"]["reservationId"]
        .as_str()
        .unwrap()
        .starts_with("RES_"));
    assert_eq!(vars["reply"]["message"], "Order confirmed");
    assert!(vars.get("compensation").is_none());
}
