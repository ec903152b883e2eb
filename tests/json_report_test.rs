use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use std::process::Command;

fn json_output(args: &[&str]) -> serde_json::Value {
    let mut cmd = Command::new(cargo_bin!("orderflow-sim"));
    cmd.args(["--speed", "200", "--fixed-latency", "20"]).args(args);

    let output = cmd.output().unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("stdout should be a JSON document")
}

#[test]
fn test_json_report_for_no_stock() {
    let report = json_output(&["run", "nostock", "--json"]);

    assert_eq!(report["scenario"], "nostock");
    assert_eq!(report["status"], "finished");
    assert_eq!(report["kpis"]["executedSteps"], 6);
    assert_eq!(report["kpis"]["retries"], 0);
    assert_eq!(report["variables"]["order"]["orderId"], "A-1007");
    assert_eq!(report["variables"]["inventory"]["reserved"], false);
    assert_eq!(report["variables"]["compensation"]["refunded"], true);
    assert_eq!(report["variables"]["reply"]["status"], "rejected");

    let steps = report["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 6);
    assert_eq!(steps[3]["id"], "inventory");
    assert!(steps[3]["state"].as_str().unwrap().starts_with("Error"));
    assert!(steps[4]["state"].as_str().unwrap().starts_with("OK"));
}

#[test]
fn test_json_report_omits_unset_variables() {
    let report = json_output(&["run", "reject", "--json"]);

    let vars = report["variables"].as_object().unwrap();
    assert!(vars.contains_key("order"));
    assert!(vars.contains_key("auth"));
    assert!(vars.contains_key("reply"));
    assert!(!vars.contains_key("inventory"));
    assert!(!vars.contains_key("compensation"));
    assert!(report["variables"]["auth"]["authId"].is_null());
}

#[test]
fn test_all_runs_every_scenario_in_order() {
    let reports = json_output(&["all", "--json"]);

    let reports = reports.as_array().unwrap();
    let scenarios: Vec<&str> = reports
        .iter()
        .map(|r| r["scenario"].as_str().unwrap())
        .collect();
    assert_eq!(scenarios, vec!["happy", "reject", "nostock"]);

    let steps: Vec<u64> = reports
        .iter()
        .map(|r| r["kpis"]["executedSteps"].as_u64().unwrap())
        .collect();
    assert_eq!(steps, vec![5, 3, 6]);
}
