use assert_cmd::Command;

#[test]
fn config_prints_resolved_settings() {
    let mut cmd = Command::cargo_bin("bookshelf-cli").unwrap();
    cmd.arg("config")
        .assert()
        .success()
        .stdout(predicates::str::contains("environment"));
}

#[test]
fn openapi_dumps_a_json_document() {
    let mut cmd = Command::cargo_bin("bookshelf-cli").unwrap();
    let output = cmd.arg("openapi").assert().success();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let spec: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(spec["info"]["title"], "Bookshelf API");
    assert!(spec["paths"]["/api/reviews/"].is_object());
}
