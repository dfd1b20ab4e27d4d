use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("cardshark"))
}

#[test]
fn help_lists_device_id_arguments() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--vendor-id").and(contains("--product-id")));
}

#[test]
fn version_prints() {
    cmd().arg("--version").assert().success();
}

#[test]
fn missing_device_ids_fail() {
    cmd()
        .assert()
        .failure()
        .stderr(contains("--vendor-id").and(contains("--product-id")));
}

#[test]
fn malformed_device_id_fails_with_parse_error() {
    cmd()
        .args(["--vendor-id", "0xzz", "--product-id", "2"])
        .assert()
        .failure()
        .stderr(contains("invalid device id"));
}

#[test]
fn device_id_out_of_range_fails() {
    cmd()
        .args(["--vendor-id", "0x10000", "--product-id", "2"])
        .assert()
        .failure()
        .stderr(contains("invalid device id"));
}

#[test]
fn missing_device_is_a_fatal_error_with_hint() {
    // 0xdead:0xbeef is not expected to be attached anywhere tests run.
    cmd()
        .args(["--vendor-id", "0xdead", "--product-id", "0xbeef"])
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}
