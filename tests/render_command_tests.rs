//! Integration tests for the render command

mod common;

use predicates::prelude::*;

use common::{HA_OVERLAY, OPENSTACK_OVN, TestWorkspace, charmbundle_cmd, fixture_path};

#[test]
fn test_render_yaml_has_no_aliases() {
    let workspace = TestWorkspace::new();
    charmbundle_cmd(&workspace)
        .arg("render")
        .arg(fixture_path(OPENSTACK_OVN))
        .assert()
        .success()
        .stdout(predicate::str::contains("mysql-innodb-cluster"))
        .stdout(predicate::str::contains("*openstack-origin").not())
        .stdout(predicate::str::contains("&openstack-origin").not());
}

#[test]
fn test_render_json_with_overlay() {
    let workspace = TestWorkspace::new();
    let output = charmbundle_cmd(&workspace)
        .arg("render")
        .arg(fixture_path(OPENSTACK_OVN))
        .arg("--overlay")
        .arg(fixture_path(HA_OVERLAY))
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let applications = value["applications"].as_object().unwrap();
    assert!(applications.contains_key("hacluster-keystone"));
    assert!(!applications.contains_key("rabbitmq-server"));
    assert_eq!(applications["keystone"]["num_units"], 3);
    assert_eq!(
        applications["keystone"]["options"]["openstack-origin"],
        "cloud:focal-wallaby"
    );
    assert_eq!(value["machines"].as_object().unwrap().len(), 13);
}

#[test]
fn test_render_inlines_includes() {
    let workspace = TestWorkspace::new();
    workspace.write_file("certs/ca.pem", "-----BEGIN CERTIFICATE-----\n");
    workspace.write_file("policy.yaml", "admin_required: role:admin\n");
    let bundle = workspace.write_file(
        "bundle.yaml",
        r"
applications:
  keystone:
    charm: cs:keystone
    num_units: 1
    options:
      ssl_ca: include-base64://certs/ca.pem
      policy-override: include-file://policy.yaml
",
    );

    charmbundle_cmd(&workspace)
        .args(["render", "--format", "json"])
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "LS0tLS1CRUdJTiBDRVJUSUZJQ0FURS0tLS0tCg==",
        ))
        .stdout(predicate::str::contains("admin_required: role:admin"))
        .stdout(predicate::str::contains("include-").not());
}

#[test]
fn test_render_missing_include_fails() {
    let workspace = TestWorkspace::new();
    let bundle = workspace.write_file(
        "bundle.yaml",
        "applications:\n  keystone:\n    charm: cs:keystone\n    num_units: 1\n    options:\n      ssl_ca: include-base64://missing.pem\n",
    );

    charmbundle_cmd(&workspace)
        .arg("render")
        .arg(&bundle)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.pem"));
}
