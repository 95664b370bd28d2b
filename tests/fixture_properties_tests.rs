//! Properties of the OpenStack on OVN fixture, checked through the library

mod common;

use charmbundle::config::CheckConfig;
use charmbundle::loader::{load_file, load_str, load_with_overlays};
use charmbundle::model::{MachineId, OptionValue};
use charmbundle::placement::Placement;
use charmbundle::validate::{self, Rule};
use common::{HA_OVERLAY, OPENSTACK_OVN, fixture_path};

#[test]
fn test_fixture_has_thirteen_machines() {
    let bundle = load_file(&fixture_path(OPENSTACK_OVN)).unwrap();
    let ids: Vec<&str> = bundle.machines.keys().map(MachineId::as_str).collect();
    let expected: Vec<String> = (0..=12).map(|n| n.to_string()).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_fixture_mysql_cluster_placement() {
    let bundle = load_file(&fixture_path(OPENSTACK_OVN)).unwrap();
    let mysql = bundle.application("mysql-innodb-cluster").unwrap();
    assert_eq!(mysql.num_units, Some(3));
    assert_eq!(mysql.to, vec!["0", "1", "2"]);
}

#[test]
fn test_fixture_placements_reference_declared_machines() {
    let bundle = load_file(&fixture_path(OPENSTACK_OVN)).unwrap();
    for (name, app) in &bundle.applications {
        for (_, directive, placement) in app.placements() {
            let placement = placement.unwrap();
            if let Some(machine) = placement.machine_id() {
                assert!(
                    bundle.has_machine(machine),
                    "{name} placed on undeclared machine via '{directive}'"
                );
            }
        }
    }
}

#[test]
fn test_fixture_relations_reference_declared_applications() {
    let bundle = load_file(&fixture_path(OPENSTACK_OVN)).unwrap();
    for relation in &bundle.relations {
        let (left, right) = relation.applications();
        assert!(bundle.application(left).is_some(), "unknown {left}");
        assert!(bundle.application(right).is_some(), "unknown {right}");
    }
}

#[test]
fn test_fixture_unit_counts() {
    let bundle = load_file(&fixture_path(OPENSTACK_OVN)).unwrap();
    for (name, app) in &bundle.applications {
        if let Some(units) = app.num_units {
            assert!(units > 0, "{name} has no units");
            assert!(app.to.len() <= units as usize, "{name} is overplaced");
        } else {
            assert!(app.to.is_empty(), "subordinate {name} has placements");
        }
    }
}

#[test]
fn test_fixture_aliases_expand_everywhere() {
    let bundle = load_file(&fixture_path(OPENSTACK_OVN)).unwrap();
    let origin = OptionValue::from("cloud:focal-wallaby");

    let mut seen = 0;
    for app in bundle.applications.values() {
        for key in ["openstack-origin", "source"] {
            if let Some(value) = app.option(key) {
                assert_eq!(value, &origin);
                seen += 1;
            }
        }
    }
    assert!(seen >= 8, "expected the origin alias in many places, saw {seen}");

    let chassis = bundle.application("ovn-chassis").unwrap();
    assert_eq!(
        chassis.option("bridge-interface-mappings"),
        Some(&OptionValue::from("br-ex:eno2"))
    );
}

#[test]
fn test_fixture_validates_cleanly() {
    let bundle = load_file(&fixture_path(OPENSTACK_OVN)).unwrap();
    let report = validate::check(&bundle, &CheckConfig::default());
    assert!(report.is_empty(), "unexpected findings: {:?}", report.findings);
}

#[test]
fn test_fixture_validates_cleanly_when_strict() {
    let bundle = load_file(&fixture_path(OPENSTACK_OVN)).unwrap();
    let config = CheckConfig::default().with_overrides(true, &[]);
    assert!(!validate::check(&bundle, &config).has_errors());
}

#[test]
fn test_fixture_containers_land_on_declared_hosts() {
    let bundle = load_file(&fixture_path(OPENSTACK_OVN)).unwrap();
    let ovn = bundle.application("ovn-central").unwrap();
    let hosts: Vec<String> = ovn
        .placements()
        .map(|(_, _, placement)| match placement.unwrap() {
            Placement::Container { machine: Some(id), .. } => id.to_string(),
            other => panic!("unexpected placement {other}"),
        })
        .collect();
    assert_eq!(hosts, vec!["3", "4", "5"]);
}

#[test]
fn test_ha_overlay_applies() {
    let bundle =
        load_with_overlays(&fixture_path(OPENSTACK_OVN), &[fixture_path(HA_OVERLAY)]).unwrap();

    let keystone = bundle.application("keystone").unwrap();
    assert_eq!(keystone.num_units, Some(3));
    assert_eq!(keystone.to, vec!["lxd:7", "lxd:8", "lxd:9"]);
    assert_eq!(
        keystone.option("openstack-origin"),
        Some(&OptionValue::from("cloud:focal-wallaby"))
    );
    assert_eq!(keystone.option("vip"), Some(&OptionValue::from("10.0.0.100")));

    assert!(bundle.application("hacluster-keystone").is_some());
    assert!(bundle.application("rabbitmq-server").is_none());
    assert!(!bundle.relations.iter().any(|r| r.involves("rabbitmq-server")));

    let identity = bundle
        .relations
        .iter()
        .filter(|r| {
            r.same_as(&charmbundle::model::Relation::new(
                "keystone:identity-service",
                "glance:identity-service",
            ))
        })
        .count();
    assert_eq!(identity, 1);

    let report = validate::check(&bundle, &CheckConfig::default());
    assert!(report.is_empty(), "unexpected findings: {:?}", report.findings);
}

#[test]
fn test_undeclared_machine_is_reported() {
    let bundle = load_str(
        r"
machines:
  '0': {}
applications:
  vault:
    charm: cs:vault
    num_units: 2
    to: ['0', '7']
",
        None,
    )
    .unwrap();
    let report = validate::check(&bundle, &CheckConfig::default());
    let findings: Vec<_> = report.by_rule(Rule::PlacementUnknownMachine).collect();
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.contains('7'));
}

#[test]
fn test_duplicate_machine_ids_are_rejected() {
    let result = load_str(
        r"
machines:
  0: {}
  '0': {}
applications: {}
",
        None,
    );
    let err = result.unwrap_err();
    assert!(err.to_string().contains("duplicate"), "got: {err}");
}

#[test]
fn test_duplicate_application_names_are_rejected() {
    let result = load_str(
        r"
applications:
  vault:
    charm: cs:vault
    num_units: 1
  vault:
    charm: cs:vault
    num_units: 3
",
        None,
    );
    assert!(result.is_err());
}
