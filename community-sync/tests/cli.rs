use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_sync_subcommand() {
    let mut cmd = Command::cargo_bin("community-sync").expect("Binary exists");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("sync"));
}

#[test]
fn sync_with_a_missing_config_file_fails_loudly() {
    let mut cmd = Command::cargo_bin("community-sync").expect("Binary exists");
    cmd.arg("sync").arg("--config").arg("/definitely/not/here.yaml");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn sync_without_required_secrets_fails_before_any_network_call() {
    let config = tempfile::NamedTempFile::new().expect("Creating temp config file failed");
    std::fs::write(
        config.path(),
        b"record_store:\n  endpoint: https://data.example.test/endpoint/data/v1\n  data_source: main\npublishing:\n  endpoint: https://cms.example.test/api\nsheet:\n  spreadsheet_id: sheet-123\n  communities_tab: Communities\n  report_tab: Report\n",
    )
    .expect("Writing temp config failed");

    let mut cmd = Command::cargo_bin("community-sync").expect("Binary exists");
    cmd.arg("sync")
        .arg("--config")
        .arg(config.path())
        .env_remove("MONGODB_DATA_API_KEY")
        .env_remove("STRAPI_API_KEY")
        .env_remove("GOOGLE_SHEETS_TOKEN");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("missing environment variable"));
}
