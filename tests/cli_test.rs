use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn fast_run(scenario: &str) -> Command {
    let mut cmd = Command::new(cargo_bin!("orderflow-sim"));
    cmd.args(["--speed", "200", "--fixed-latency", "20", "run", scenario]);
    cmd
}

#[test]
fn test_cli_happy_path() {
    fast_run("happy")
        .assert()
        .success()
        .stdout(predicate::str::contains("status: Running"))
        .stdout(predicate::str::contains("Order confirmation sent"))
        .stdout(predicate::str::contains(
            "Scenario happy (A-1001) finished with status Finished",
        ))
        .stdout(predicate::str::contains("steps 5"))
        .stdout(predicate::str::contains(r#""status": "confirmed""#));
}

#[test]
fn test_cli_payment_rejected() {
    fast_run("reject")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Payment rejected: Payment rejected (over limit)",
        ))
        .stdout(predicate::str::contains("Decision: rejection path"))
        .stdout(predicate::str::contains("Order rejected - payment failed"))
        .stdout(predicate::str::contains("steps 3"))
        .stdout(predicate::str::contains("Inventory reservation started").not());
}

#[test]
fn test_cli_no_stock_runs_compensation() {
    fast_run("nostock")
        .assert()
        .success()
        .stdout(predicate::str::contains("Inventory failed: Out of stock"))
        .stdout(predicate::str::contains("Compensation started (refund)"))
        .stdout(predicate::str::contains("Refund complete"))
        .stdout(predicate::str::contains("steps 6"));
}

#[test]
fn test_cli_rejects_unknown_scenario() {
    let mut cmd = Command::new(cargo_bin!("orderflow-sim"));
    cmd.args(["run", "sideways"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_cli_rejects_speed_out_of_range() {
    let mut cmd = Command::new(cargo_bin!("orderflow-sim"));
    cmd.args(["--speed", "0", "run", "happy"]);

    cmd.assert().failure();

    let mut cmd = Command::new(cargo_bin!("orderflow-sim"));
    cmd.args(["--speed", "201", "run", "happy"]);

    cmd.assert().failure();
}
