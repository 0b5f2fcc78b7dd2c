mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("credit-gateway"));
    cmd.arg("tests/fixtures/requests.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "row,op,status,transaction_id,response_code,response_text",
        ))
        .stdout(predicate::str::contains("1,charge,approved,1000000,00,APPROVAL"))
        .stdout(predicate::str::contains("3,capture,approved,1000002,00,"))
        .stdout(predicate::str::contains("4,void,approved,1000003,00,"))
        .stdout(predicate::str::contains(
            "5,charge,error,,,Amount must be greater than 0.",
        ))
        .stdout(predicate::str::contains(
            "6,refund,error,,,\"The only supported currency is \"\"usd\"\".\"",
        ))
        .stdout(predicate::str::contains(
            "7,capture,error,1000004,3,Invalid original transaction.",
        ))
        .stdout(predicate::str::contains("8,giftactivate,approved,1000005,0,Success"))
        .stdout(predicate::str::contains("9,cpcedit,approved,1000006,00,"));

    Ok(())
}

#[test]
fn test_cli_render_prints_request_documents() {
    let mut cmd = Command::new(cargo_bin!("credit-gateway"));
    cmd.arg("tests/fixtures/requests.csv").arg("--render");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<SecretAPIKey>"))
        .stdout(predicate::str::contains("<Amt>50.00</Amt>"))
        .stdout(predicate::str::contains("<AllowDup>Y</AllowDup>"))
        .stdout(predicate::str::contains("<TaxType>SALESTAX</TaxType>"))
        .stderr(predicate::str::contains("row 5: Amount must be greater than 0."));
}

#[test]
fn test_cli_with_legacy_credentials() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = dir.path().join("config.json");
    std::fs::write(
        &config,
        r#"{"licenseId": 1, "siteId": 2, "deviceId": 3, "userName": "user", "password": "secret"}"#,
    )?;
    let input = dir.path().join("requests.csv");
    common::generate_csv(
        &input,
        &[[
            "verify", "", "", "4012002000060016", "12", "2025", "", "", "", "", "", "", "",
        ]],
    )?;

    let mut cmd = Command::new(cargo_bin!("credit-gateway"));
    cmd.arg(&input).arg("--config").arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1,verify,approved,1000000,00,APPROVAL"));

    Ok(())
}

#[test]
fn test_cli_rejects_incomplete_credentials() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"siteId": 2}"#)?;

    let mut cmd = Command::new(cargo_bin!("credit-gateway"));
    cmd.arg("tests/fixtures/requests.csv").arg("--config").arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("secret API key"));

    Ok(())
}

#[test]
fn test_cli_missing_input_fails() {
    let mut cmd = Command::new(cargo_bin!("credit-gateway"));
    cmd.arg("does/not/exist.csv");
    cmd.assert().failure();
}
