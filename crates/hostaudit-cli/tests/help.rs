use assert_cmd::Command;

/// Helper to get a Command for the hostaudit binary.
#[allow(deprecated)]
fn hostaudit_cmd() -> Command {
    Command::cargo_bin("hostaudit").unwrap()
}

#[test]
fn help_works() {
    hostaudit_cmd().arg("--help").assert().success();
}

#[test]
fn audit_help_lists_host_sources() {
    hostaudit_cmd()
        .args(["audit", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("--hosts-file"))
        .stdout(predicates::str::contains("--password-env"));
}

#[test]
fn html_is_a_subcommand_and_audit_flag() {
    hostaudit_cmd()
        .args(["html", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("--report"));
    hostaudit_cmd()
        .args(["audit", "--help"])
        .assert()
        .success()
        .stdout(predicates::str::contains("--write-html"))
        .stdout(predicates::str::contains("--html-out"));
}
