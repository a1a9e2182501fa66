mod support;

use predicates::str::contains;

use support::TestData;

#[test]
fn tick_help_works() {
    support::tick_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("persistent task list"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = ["ui", "add", "list", "toggle", "rm", "clear", "mv"];

    for cmd in subcommands {
        support::tick_cmd()
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn list_on_fresh_data_dir_is_empty() {
    let data = TestData::new();
    data.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("Tasks (all)"))
        .stdout(contains("0 tasks left"))
        .stdout(contains("tick add <text>"));
}

#[test]
fn quiet_suppresses_human_output() {
    let data = TestData::new();
    data.cmd()
        .args(["add", "Buy", "milk", "-q"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn invalid_filter_is_rejected_by_parser() {
    let data = TestData::new();
    data.cmd()
        .args(["list", "--filter", "done"])
        .assert()
        .failure()
        .stderr(contains("invalid filter"));
}

#[test]
fn bad_config_exits_with_user_error() {
    let data = TestData::new();
    data.write_config("[ui]\npoll_ms = 0\n").expect("write config");

    data.cmd()
        .arg("list")
        .assert()
        .code(2)
        .stderr(contains("Invalid configuration"));
}

#[test]
fn bad_config_error_envelope_in_json() -> Result<(), Box<dyn std::error::Error>> {
    let data = TestData::new();
    data.write_config("[storage]\nslot = \"\"\n")?;

    let output = data.cmd().args(["list", "--json"]).output()?;
    assert_eq!(output.status.code(), Some(2));

    let envelope: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(envelope["schema_version"], "tick.v1");
    assert_eq!(envelope["command"], "list");
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["error"]["code"], 2);
    assert_eq!(envelope["error"]["kind"], "invalid_config");
    assert!(envelope.get("data").is_none());
    Ok(())
}

#[test]
fn malformed_config_exits_with_user_error() {
    let data = TestData::new();
    data.write_config("[ui\nmouse = ").expect("write config");

    data.cmd()
        .arg("list")
        .assert()
        .code(2)
        .stderr(contains("Malformed config file"));

    data.write_config("[ui]\nmouse = \"yes\"\n").expect("write config");
    data.cmd().arg("list").assert().code(2);
}

#[test]
fn slot_flag_rejects_path_like_names() {
    let data = TestData::new();
    data.cmd()
        .args(["--slot", "../escape", "list"])
        .assert()
        .code(2);
}
