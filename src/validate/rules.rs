//! Individual checks

use std::collections::BTreeSet;

use super::{Checker, Rule};
use crate::constraints::Constraints;
use crate::mappings::MappingKind;
use crate::model::{Bundle, MachineId, Relation};
use crate::placement::Placement;

pub(super) fn check_top_level(bundle: &Bundle, checker: &mut Checker) {
    for key in bundle.unknown_keys() {
        checker.report(
            Rule::BundleUnknownKey,
            format!("key '{key}'"),
            "not a bundle section, the orchestrator may reject it",
        );
    }
}

pub(super) fn check_machines(bundle: &Bundle, checker: &mut Checker) {
    let referenced = bundle.referenced_machines();
    for (id, machine) in &bundle.machines {
        let subject = format!("machine '{id}'");
        if let Some(result) = machine.parsed_constraints() {
            check_constraints(&subject, result, checker);
        }
        if !referenced.contains(id) {
            checker.report(
                Rule::MachineUnused,
                subject,
                "declared but no application is placed on it",
            );
        }
    }
}

pub(super) fn check_applications(bundle: &Bundle, checker: &mut Checker) {
    for (name, app) in &bundle.applications {
        let subject = format!("application '{name}'");

        if let Err(e) = app.charm_ref() {
            checker.report(Rule::CharmInvalid, &subject, e.to_string());
        }

        if app.num_units == Some(0) {
            checker.report(
                Rule::UnitsZero,
                &subject,
                "num_units must be at least 1; omit it for subordinate charms",
            );
        }

        let placed = app.to.len();
        let units = app.unit_count() as usize;
        if placed > units {
            checker.report(
                Rule::UnitsOverplaced,
                &subject,
                format!("{placed} placement directive(s) for {units} unit(s)"),
            );
        }

        if let Some(result) = app.parsed_constraints() {
            check_constraints(&subject, result, checker);
        }

        for (key, value) in &app.options {
            let (Some(kind), Some(text)) = (MappingKind::for_option(key), value.as_str()) else {
                continue;
            };
            if let Err(e) = kind.check(text) {
                checker.report(
                    Rule::OptionMappingInvalid,
                    format!("application '{name}' option '{key}'"),
                    e.to_string(),
                );
            }
        }
    }
}

fn check_constraints(
    subject: &str,
    result: Result<Constraints, crate::constraints::ConstraintsError>,
    checker: &mut Checker,
) {
    match result {
        Ok(constraints) => {
            for key in constraints.unknown.keys() {
                checker.report(
                    Rule::ConstraintsUnknownKey,
                    subject,
                    format!("unknown constraint '{key}'"),
                );
            }
        }
        Err(e) => checker.report(Rule::ConstraintsInvalid, subject, e.to_string()),
    }
}

pub(super) fn check_placements(bundle: &Bundle, checker: &mut Checker) {
    for (name, app) in &bundle.applications {
        let app_series = app.effective_series(bundle.series.as_deref());

        for (unit, directive, placement) in app.placements() {
            let subject = format!("unit '{name}/{unit}'");
            let placement = match placement {
                Ok(placement) => placement,
                Err(e) => {
                    checker.report(Rule::PlacementInvalid, subject, e.to_string());
                    continue;
                }
            };

            match &placement {
                Placement::Unit { application, index } => {
                    check_unit_target(bundle, &subject, application, *index, checker);
                }
                _ => {
                    let Some(machine_id) = placement.machine_id() else {
                        continue;
                    };
                    if !bundle.has_machine(machine_id) {
                        checker.report(
                            Rule::PlacementUnknownMachine,
                            subject,
                            format!("'{directive}' names machine '{machine_id}', which is not declared"),
                        );
                        continue;
                    }
                    if matches!(placement, Placement::Machine(_)) {
                        check_series(bundle, &subject, machine_id, app_series, checker);
                    }
                }
            }
        }
    }
}

fn check_unit_target(
    bundle: &Bundle,
    subject: &str,
    application: &str,
    index: u32,
    checker: &mut Checker,
) {
    match bundle.application(application) {
        None => checker.report(
            Rule::PlacementUnknownUnit,
            subject,
            format!("placed next to '{application}/{index}', but '{application}' is not declared"),
        ),
        Some(target) if index >= target.unit_count() => checker.report(
            Rule::PlacementUnknownUnit,
            subject,
            format!(
                "placed next to '{application}/{index}', but '{application}' has {} unit(s)",
                target.unit_count()
            ),
        ),
        Some(_) => {}
    }
}

fn check_series(
    bundle: &Bundle,
    subject: &str,
    machine_id: &MachineId,
    app_series: Option<&str>,
    checker: &mut Checker,
) {
    let machine_series = bundle
        .machines
        .get(machine_id)
        .and_then(|machine| machine.series.as_deref());
    if let (Some(machine_series), Some(app_series)) = (machine_series, app_series) {
        if machine_series != app_series {
            checker.report(
                Rule::SeriesMismatch,
                subject,
                format!(
                    "series '{app_series}' on machine '{machine_id}' which runs '{machine_series}'"
                ),
            );
        }
    }
}

pub(super) fn check_relations(bundle: &Bundle, checker: &mut Checker) {
    let mut seen: Vec<&Relation> = Vec::new();

    for relation in &bundle.relations {
        let subject = format!("relation '{relation}'");

        let (left, right) = match relation.endpoints() {
            Ok(endpoints) => endpoints,
            Err(e) => {
                checker.report(Rule::RelationInvalidEndpoint, subject, e.to_string());
                continue;
            }
        };

        let missing: BTreeSet<&str> = [left.application.as_str(), right.application.as_str()]
            .into_iter()
            .filter(|app| !bundle.is_relatable(app))
            .collect();
        for app in missing {
            checker.report(
                Rule::RelationUnknownApplication,
                &subject,
                format!("application '{app}' is not declared"),
            );
        }

        if left.application == right.application {
            checker.report(
                Rule::RelationSelf,
                &subject,
                "both endpoints belong to the same application",
            );
        }

        if seen.iter().any(|known| known.same_as(relation)) {
            checker.report(Rule::RelationDuplicate, &subject, "declared more than once");
        } else {
            seen.push(relation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Report, Rule, Severity, check};
    use crate::config::CheckConfig;
    use crate::loader::load_str;

    fn report_for(yaml: &str) -> Report {
        let bundle = load_str(yaml, None).unwrap();
        check(&bundle, &CheckConfig::default())
    }

    fn rules(report: &Report) -> Vec<Rule> {
        report.findings.iter().map(|finding| finding.rule).collect()
    }

    #[test]
    fn test_clean_bundle() {
        let report = report_for(
            r"
machines:
  '0':
    constraints: mem=3072M
applications:
  vault:
    charm: cs:vault
    num_units: 1
    to: ['0']
  vault-mysql-router:
    charm: cs:mysql-router
relations:
- ['vault:shared-db', 'vault-mysql-router:shared-db']
",
        );
        assert!(report.is_empty(), "{:?}", report.findings);
    }

    #[test]
    fn test_placement_on_undeclared_machine() {
        let report = report_for(
            "machines:\n  '0': {}\napplications:\n  vault:\n    charm: vault\n    num_units: 2\n    to: ['0', 'lxd:7']\n",
        );
        assert_eq!(rules(&report), vec![Rule::PlacementUnknownMachine]);
        assert!(report.findings[0].message.contains("'7'"));
    }

    #[test]
    fn test_invalid_placement() {
        let report = report_for(
            "applications:\n  vault:\n    charm: vault\n    num_units: 1\n    to: ['docker:0']\n",
        );
        assert_eq!(rules(&report), vec![Rule::PlacementInvalid]);
    }

    #[test]
    fn test_unit_placement_targets() {
        let report = report_for(
            r"
applications:
  ceph-osd:
    charm: ceph-osd
    num_units: 2
  ceph-mon:
    charm: ceph-mon
    num_units: 3
    to: ['lxd:ceph-osd/0', 'lxd:ceph-osd/2', 'nova-compute/0']
",
        );
        assert_eq!(
            rules(&report),
            vec![Rule::PlacementUnknownUnit, Rule::PlacementUnknownUnit]
        );
    }

    #[test]
    fn test_units_zero_and_overplaced() {
        let report = report_for(
            r"
machines:
  '0': {}
  '1': {}
applications:
  keystone:
    charm: keystone
    num_units: 0
  glance:
    charm: glance
    num_units: 1
    to: ['0', '1']
  ovn-chassis:
    charm: ovn-chassis
    to: ['0']
",
        );
        assert_eq!(report.by_rule(Rule::UnitsZero).count(), 1);
        let overplaced: Vec<_> = report
            .by_rule(Rule::UnitsOverplaced)
            .map(|finding| finding.subject.as_str())
            .collect();
        assert_eq!(
            overplaced,
            vec!["application 'glance'", "application 'ovn-chassis'"]
        );
    }

    #[test]
    fn test_relation_checks() {
        let report = report_for(
            r"
applications:
  keystone:
    charm: keystone
    num_units: 1
  mysql:
    charm: mysql
    num_units: 1
relations:
- ['keystone:shared-db', 'mysql:shared-db']
- ['mysql:shared-db', 'keystone:shared-db']
- ['keystone:identity-service', 'glance:identity-service']
- ['keystone:cluster', 'keystone:ha']
- ['keystone:', 'mysql:db']
",
        );
        assert_eq!(
            rules(&report),
            vec![
                Rule::RelationDuplicate,
                Rule::RelationUnknownApplication,
                Rule::RelationSelf,
                Rule::RelationInvalidEndpoint,
            ]
        );
        assert_eq!(report.errors().count(), 2);
        assert_eq!(report.warnings().count(), 2);
    }

    #[test]
    fn test_charm_and_constraints() {
        let report = report_for(
            r"
machines:
  '0':
    constraints: mem=lots
  '1':
    constraints: mem=1G gpus=1
applications:
  vault:
    charm: 'git:vault'
    num_units: 2
    to: ['0', '1']
",
        );
        assert_eq!(
            rules(&report),
            vec![
                Rule::ConstraintsInvalid,
                Rule::ConstraintsUnknownKey,
                Rule::CharmInvalid,
            ]
        );
    }

    #[test]
    fn test_option_mappings() {
        let report = report_for(
            r"
applications:
  ovn-chassis:
    charm: ovn-chassis
    options:
      ovn-bridge-mappings: physnet1:br-provider
      bridge-interface-mappings: 'br-provider:eth1 br-data:eth1'
      vlan-ranges: physnet1:2000:1000
      debug: true
",
        );
        let subjects: Vec<_> = report
            .by_rule(Rule::OptionMappingInvalid)
            .map(|finding| finding.subject.as_str())
            .collect();
        assert_eq!(
            subjects,
            vec![
                "application 'ovn-chassis' option 'bridge-interface-mappings'",
                "application 'ovn-chassis' option 'vlan-ranges'",
            ]
        );
    }

    #[test]
    fn test_unused_machine_and_series() {
        let report = report_for(
            r"
series: focal
machines:
  '0':
    series: bionic
  '1': {}
applications:
  vault:
    charm: vault
    num_units: 1
    to: ['0']
",
        );
        assert_eq!(rules(&report), vec![Rule::MachineUnused, Rule::SeriesMismatch]);
        assert!(report
            .findings
            .iter()
            .all(|finding| finding.severity == Severity::Warning));
    }

    #[test]
    fn test_unknown_top_level_key() {
        let report = report_for("applications: {}\ncolour: blue\n");
        assert_eq!(rules(&report), vec![Rule::BundleUnknownKey]);
    }

    #[test]
    fn test_relation_to_consumed_offer() {
        let report = report_for(
            r"
saas:
  remote-db:
    url: admin/models.mysql
applications:
  wordpress:
    charm: ch:wordpress
    num_units: 1
relations:
- [wordpress:db, remote-db:db]
- [wordpress:cache, memcached:cache]
",
        );
        assert_eq!(rules(&report), vec![Rule::RelationUnknownApplication]);
        assert!(report.findings[0].message.contains("memcached"));
    }
}
