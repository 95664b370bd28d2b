//! Consistency checks over a loaded bundle
//!
//! The checks cover what a bundle can get wrong on its own: placements and
//! relations pointing at things that are not declared, unit counts that do
//! not match placements, and malformed charm references, constraints and
//! mapping options. Whether a charm exists or two endpoints are compatible
//! is for the orchestrator to decide.

mod rules;

use serde::Serialize;
use std::fmt;
use tracing::{debug, info};
use wax::{CandidatePath, Glob, Pattern};

use crate::config::CheckConfig;
use crate::model::Bundle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// Every check, with a stable code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    PlacementUnknownMachine,
    PlacementUnknownUnit,
    PlacementInvalid,
    RelationUnknownApplication,
    RelationInvalidEndpoint,
    RelationDuplicate,
    RelationSelf,
    UnitsZero,
    UnitsOverplaced,
    CharmInvalid,
    ConstraintsInvalid,
    ConstraintsUnknownKey,
    OptionMappingInvalid,
    MachineUnused,
    SeriesMismatch,
    BundleUnknownKey,
}

impl Rule {
    pub const ALL: [Rule; 16] = [
        Rule::PlacementUnknownMachine,
        Rule::PlacementUnknownUnit,
        Rule::PlacementInvalid,
        Rule::RelationUnknownApplication,
        Rule::RelationInvalidEndpoint,
        Rule::RelationDuplicate,
        Rule::RelationSelf,
        Rule::UnitsZero,
        Rule::UnitsOverplaced,
        Rule::CharmInvalid,
        Rule::ConstraintsInvalid,
        Rule::ConstraintsUnknownKey,
        Rule::OptionMappingInvalid,
        Rule::MachineUnused,
        Rule::SeriesMismatch,
        Rule::BundleUnknownKey,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Rule::PlacementUnknownMachine => "placement-unknown-machine",
            Rule::PlacementUnknownUnit => "placement-unknown-unit",
            Rule::PlacementInvalid => "placement-invalid",
            Rule::RelationUnknownApplication => "relation-unknown-application",
            Rule::RelationInvalidEndpoint => "relation-invalid-endpoint",
            Rule::RelationDuplicate => "relation-duplicate",
            Rule::RelationSelf => "relation-self",
            Rule::UnitsZero => "units-zero",
            Rule::UnitsOverplaced => "units-overplaced",
            Rule::CharmInvalid => "charm-invalid",
            Rule::ConstraintsInvalid => "constraints-invalid",
            Rule::ConstraintsUnknownKey => "constraints-unknown-key",
            Rule::OptionMappingInvalid => "option-mapping-invalid",
            Rule::MachineUnused => "machine-unused",
            Rule::SeriesMismatch => "series-mismatch",
            Rule::BundleUnknownKey => "bundle-unknown-key",
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            Rule::RelationDuplicate
            | Rule::RelationSelf
            | Rule::ConstraintsUnknownKey
            | Rule::MachineUnused
            | Rule::SeriesMismatch
            | Rule::BundleUnknownKey => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One problem found in a bundle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub rule: Rule,
    pub severity: Severity,
    /// What the finding is about, e.g. `application 'vault'`
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity, self.rule, self.subject, self.message
        )
    }
}

/// All findings for one bundle, in check order
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|finding| finding.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings raised by `rule`
    pub fn by_rule(&self, rule: Rule) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(move |finding| finding.rule == rule)
    }
}

/// Collects findings, applying the ignore list and strictness
pub(crate) struct Checker<'a> {
    config: &'a CheckConfig,
    ignored: Vec<Rule>,
    report: Report,
}

impl<'a> Checker<'a> {
    fn new(config: &'a CheckConfig) -> Self {
        let ignored = Rule::ALL
            .into_iter()
            .filter(|rule| {
                config
                    .ignore
                    .iter()
                    .any(|pattern| matches_rule(pattern, *rule))
            })
            .collect();
        Self {
            config,
            ignored,
            report: Report::default(),
        }
    }

    pub(crate) fn report(
        &mut self,
        rule: Rule,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        if self.ignored.contains(&rule) {
            return;
        }
        let severity = if self.config.strict {
            Severity::Error
        } else {
            rule.default_severity()
        };
        let finding = Finding {
            rule,
            severity,
            subject: subject.into(),
            message: message.into(),
        };
        debug!(%finding, "finding");
        self.report.findings.push(finding);
    }
}

/// Check whether an ignore pattern selects a rule
///
/// Uses wax so that `relation-*` style patterns work.
fn matches_rule(pattern: &str, rule: Rule) -> bool {
    if pattern == rule.code() {
        return true;
    }
    Glob::new(pattern).is_ok_and(|glob| glob.is_match(CandidatePath::from(rule.code())))
}

/// Run every check against `bundle`
pub fn check(bundle: &Bundle, config: &CheckConfig) -> Report {
    let mut checker = Checker::new(config);

    rules::check_top_level(bundle, &mut checker);
    rules::check_machines(bundle, &mut checker);
    rules::check_applications(bundle, &mut checker);
    rules::check_placements(bundle, &mut checker);
    rules::check_relations(bundle, &mut checker);

    let report = checker.report;
    info!(
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "bundle checked"
    );
    report
}
