use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use assert_cmd::Command;
use parameter_manager_client::{ClientConf, ClientError, Parameter, ParameterFormat};
use predicates::prelude::*;
use tempfile::TempDir;
use test_parameter_manager_server::{TestsContext, start_test_parameter_server};

const PROG_NAME: &str = "pmctl";
const NAME: &str = "projects/p1/locations/global/parameters/param1";
const KMS_KEY: &str = "projects/p1/locations/global/keyRings/r/cryptoKeys/k";

fn seeded_parameter() -> Parameter {
    Parameter {
        name: NAME.to_owned(),
        labels: Some(HashMap::from([("team".to_owned(), "core".to_owned())])),
        format: Some(ParameterFormat::Json),
        ..Default::default()
    }
}

fn write_conf(dir: &TempDir, conf: &ClientConf) -> Result<PathBuf, ClientError> {
    let conf_path = dir.path().join("pmctl.json");
    conf.save(&conf_path)?;
    Ok(conf_path)
}

fn pmctl(conf_path: &Path) -> Command {
    let mut cmd = Command::cargo_bin(PROG_NAME).expect("the pmctl binary is built");
    cmd.env_remove("PM_CLI_FORMAT")
        .env_remove("PM_CLI_CONF")
        .arg("--conf")
        .arg(conf_path);
    cmd
}

fn start() -> Result<(TestsContext, TempDir, PathBuf), ClientError> {
    let ctx = start_test_parameter_server(vec![seeded_parameter()])?;
    let dir = tempfile::tempdir()?;
    let conf_path = write_conf(&dir, &ctx.client_conf())?;
    Ok((ctx, dir, conf_path))
}

#[tokio::test]
async fn test_update_kms_key() -> Result<(), ClientError> {
    let (ctx, _dir, conf_path) = start()?;

    pmctl(&conf_path)
        .args([
            "parameters",
            "update-kms-key",
            "--project-id",
            "p1",
            "--parameter-id",
            "param1",
            "--kms-key",
            KMS_KEY,
        ])
        .assert()
        .success()
        .stdout(format!("Updated parameter {NAME} with kms_key {KMS_KEY}\n"));

    assert_eq!(
        ctx.parameter(NAME),
        Some(Parameter {
            kms_key: Some(KMS_KEY.to_owned()),
            ..seeded_parameter()
        })
    );

    ctx.stop_server().await
}

#[tokio::test]
async fn test_update_kms_key_unknown_parameter() -> Result<(), ClientError> {
    let (ctx, _dir, conf_path) = start()?;

    pmctl(&conf_path)
        .args([
            "parameters",
            "update-kms-key",
            "-p",
            "p1",
            "-i",
            "missing",
            "-k",
            KMS_KEY,
        ])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("ERROR: failed to update parameter"));

    ctx.stop_server().await
}

#[tokio::test]
async fn test_update_kms_key_without_credentials() -> Result<(), ClientError> {
    let ctx = start_test_parameter_server(vec![seeded_parameter()])?;
    let dir = tempfile::tempdir()?;
    let conf_path = write_conf(
        &dir,
        &ClientConf {
            access_token: None,
            ..ctx.client_conf()
        },
    )?;

    pmctl(&conf_path)
        .args([
            "parameters",
            "update-kms-key",
            "-p",
            "p1",
            "-i",
            "param1",
            "-k",
            KMS_KEY,
        ])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains(
            "failed to create Parameter Manager client",
        ));
    assert!(ctx.received_updates().is_empty());

    ctx.stop_server().await
}

#[tokio::test]
async fn test_url_override() -> Result<(), ClientError> {
    let ctx = start_test_parameter_server(vec![seeded_parameter()])?;
    let dir = tempfile::tempdir()?;
    let conf_path = write_conf(
        &dir,
        &ClientConf {
            parameter_manager_url: "http://127.0.0.1:1".to_owned(),
            ..ctx.client_conf()
        },
    )?;

    pmctl(&conf_path)
        .args(["--url", ctx.server_url.as_str()])
        .args(["parameters", "get", "-p", "p1", "-i", "param1"])
        .assert()
        .success()
        .stdout(format!("Found parameter {NAME} with format JSON\n"));

    ctx.stop_server().await
}

#[tokio::test]
async fn test_remove_kms_key_then_get_as_json() -> Result<(), ClientError> {
    let (ctx, _dir, conf_path) = start()?;

    pmctl(&conf_path)
        .args(["parameters", "update-kms-key", "-p", "p1", "-i", "param1", "-k", KMS_KEY])
        .assert()
        .success();

    pmctl(&conf_path)
        .env("PM_CLI_FORMAT", "json")
        .args(["parameters", "get", "-p", "p1", "-i", "param1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("\"kmsKey\": \"{KMS_KEY}\"")));

    pmctl(&conf_path)
        .args(["parameters", "remove-kms-key", "-p", "p1", "-i", "param1"])
        .assert()
        .success()
        .stdout(format!("Removed kms_key for parameter {NAME}\n"));

    assert_eq!(ctx.parameter(NAME), Some(seeded_parameter()));

    ctx.stop_server().await
}

#[test]
fn test_missing_arguments() {
    Command::cargo_bin(PROG_NAME)
        .expect("the pmctl binary is built")
        .args(["parameters", "update-kms-key", "-p", "p1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--parameter-id"));
}
