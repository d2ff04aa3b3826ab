//
//  tfgit
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! End-to-end runs of the `tfgit` binary.

use assert_cmd::Command;
use mockito::Server;
use predicates::prelude::*;
use tempfile::TempDir;

use tfgit::exit_codes;

/// A command isolated from the user's config, environment and clone.
fn tfgit(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tfgit").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("APPDATA", home.path())
        .env_remove("TFGIT_COLLECTION")
        .env_remove("TFGIT_PROJECT")
        .env_remove("TFGIT_REPO")
        .env_remove("TFGIT_TOKEN")
        .env_remove("TFGIT_DEBUG")
        .env("TFGIT_NO_PROMPT", "true");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    tfgit(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pr"))
        .stdout(predicate::str::contains("item"))
        .stdout(predicate::str::contains("--collection"));
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    tfgit(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let home = TempDir::new().unwrap();
    tfgit(&home)
        .arg("frobnicate")
        .assert()
        .code(exit_codes::USAGE);
}

#[test]
fn test_missing_collection_is_reported() {
    let home = TempDir::new().unwrap();
    tfgit(&home)
        .args(["repo", "list"])
        .assert()
        .code(exit_codes::ERROR)
        .stderr(predicate::str::contains("Could not determine collection URL"));
}

#[test]
fn test_config_set_then_get() {
    let home = TempDir::new().unwrap();
    tfgit(&home)
        .args(["config", "set", "--host", "dev.azure.com", "default_project", "Fiber"])
        .assert()
        .success();
    tfgit(&home)
        .args(["config", "get", "hosts.dev.azure.com.default_project"])
        .assert()
        .success()
        .stdout("Fiber\n");
    tfgit(&home)
        .args(["config", "set", "method_override", "perhaps"])
        .assert()
        .failure();
}

#[test]
fn test_completion_script() {
    let home = TempDir::new().unwrap();
    tfgit(&home)
        .args(["completion", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef tfgit"));
}

#[test]
fn test_repo_list_json_against_mock_server() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/fabrikam/Fiber/_apis/git/repositories")
        .match_header("authorization", "Basic OnNlY3JldA==")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"count": 2, "value": [
                {"id": "5febef5a-833d-4e14-b9c0-14cb638f91e6", "name": "widgets"},
                {"id": "7ba9e3b4-6f49-4e32-9a5b-9d0d1c3b0f11", "name": "Gadgets"}
            ]}"#,
        )
        .create();

    let home = TempDir::new().unwrap();
    tfgit(&home)
        .env("TFGIT_TOKEN", "secret")
        .args(["repo", "list", "--json", "-p", "Fiber"])
        .args(["--collection", &format!("{}/fabrikam", server.url())])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Gadgets\""));
    mock.assert();
}

#[test]
fn test_not_found_maps_to_exit_code() {
    let mut server = Server::new();
    server
        .mock("GET", "/fabrikam/_apis/git/repositories/missing")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "TF401019: missing", "typeKey": "GitRepositoryNotFoundException"}"#)
        .create();

    let home = TempDir::new().unwrap();
    tfgit(&home)
        .env("TFGIT_TOKEN", "secret")
        .env("TFGIT_COLLECTION", format!("{}/fabrikam", server.url()))
        .args(["repo", "view", "missing"])
        .assert()
        .code(exit_codes::NOT_FOUND)
        .stderr(predicate::str::contains("TF401019"));
}
