//! Display functions for bundles, applications and findings

use console::Style;
use std::path::Path;

use crate::constraints::Constraints;
use crate::model::{Application, Bundle, Machine, MachineId, Relation, UnitPlacement};
use crate::validate::{Finding, Report, Severity};

macro_rules! display_opt_field {
    ($indent:expr, $label:expr, $value:expr) => {
        if let Some(ref v) = $value {
            println!("{}{} {}", $indent, Style::new().bold().apply_to($label), v);
        }
    };
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Error => Style::new().bold().red(),
        Severity::Warning => Style::new().bold().yellow(),
    }
}

/// One finding per line: `error[rule] subject: message`
pub fn display_finding(finding: &Finding) {
    println!(
        "  {}{} {}: {}",
        severity_style(finding.severity).apply_to(finding.severity),
        Style::new().dim().apply_to(format!("[{}]", finding.rule)),
        Style::new().bold().apply_to(&finding.subject),
        finding.message
    );
}

/// Header, findings and a one-line verdict for a checked bundle
pub fn display_report(path: &Path, report: &Report) {
    println!("{}", Style::new().bold().apply_to(path.display()));
    for finding in &report.findings {
        display_finding(finding);
    }

    let errors = report.errors().count();
    let warnings = report.warnings().count();
    if errors > 0 {
        println!(
            "  {} {} error(s), {} warning(s)",
            Style::new().bold().red().apply_to("✗"),
            errors,
            warnings
        );
    } else if warnings > 0 {
        println!(
            "  {} {} warning(s)",
            Style::new().bold().yellow().apply_to("!"),
            warnings
        );
    } else {
        println!("  {} ok", Style::new().bold().green().apply_to("✓"));
    }
}

/// A bundle that could not be loaded at all
pub fn display_load_failure(path: &Path, reason: &str) {
    println!("{}", Style::new().bold().apply_to(path.display()));
    println!("  {} {}", Style::new().bold().red().apply_to("error"), reason);
}

fn units_label(app: &Application) -> String {
    if app.is_subordinate() {
        "subordinate".to_string()
    } else {
        format!("{} unit(s)", app.unit_count())
    }
}

/// Canonical key order and sizes; unparsable strings are shown as written
fn normalized_constraints(raw: &str) -> String {
    Constraints::parse(raw).map_or_else(|_| raw.to_string(), |c| c.to_string())
}

fn charm_label(app: &Application) -> String {
    match app.charm_ref() {
        Ok(charm) if charm.is_local() => format!("{} (local)", app.charm),
        _ => app.charm.clone(),
    }
}

/// Display application in list format
pub fn display_application_line(name: &str, app: &Application, detailed: bool) {
    println!(
        "  {} {} {}",
        Style::new().bold().yellow().apply_to(name),
        app.charm,
        Style::new().dim().apply_to(format!("({})", units_label(app)))
    );
    if !detailed {
        return;
    }

    display_opt_field!("    ", "Channel:", app.channel);
    display_opt_field!("    ", "Series:", app.series);
    display_opt_field!("    ", "Constraints:", app.constraints);
    if !app.to.is_empty() {
        println!(
            "    {} {}",
            Style::new().bold().apply_to("To:"),
            app.to.join(", ")
        );
    }
    if !app.options.is_empty() {
        println!(
            "    {} {}",
            Style::new().bold().apply_to("Options:"),
            app.options.len()
        );
    }
}

/// Display machine in list format
pub fn display_machine_line(
    id: &MachineId,
    machine: &Machine,
    units: &[UnitPlacement],
    detailed: bool,
) {
    let hosted = if units.is_empty() {
        Style::new().dim().apply_to("unused".to_string())
    } else {
        Style::new().dim().apply_to(format!("{} unit(s)", units.len()))
    };
    println!("  {} {}", Style::new().bold().yellow().apply_to(id), hosted);
    if !detailed {
        return;
    }

    display_opt_field!("    ", "Series:", machine.series);
    display_opt_field!("    ", "Constraints:", machine.constraints);
    for unit in units {
        println!(
            "    {} {}",
            Style::new().cyan().apply_to(unit.unit_name()),
            Style::new().dim().apply_to(&unit.placement)
        );
    }
}

pub fn display_relation_line(relation: &Relation) {
    println!(
        "  {} {} {}",
        Style::new().bold().apply_to(&relation.0),
        Style::new().dim().apply_to("<->"),
        Style::new().bold().apply_to(&relation.1)
    );
}

/// Display everything known about one application
pub fn display_application(bundle: &Bundle, name: &str, app: &Application) {
    println!("{}", Style::new().bold().yellow().apply_to(name));
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Charm:"),
        charm_label(app)
    );
    display_opt_field!("  ", "Channel:", app.channel);
    display_opt_field!("  ", "Revision:", app.revision);
    display_opt_field!(
        "  ",
        "Series:",
        app.effective_series(bundle.series.as_deref())
    );
    println!(
        "  {} {}",
        Style::new().bold().apply_to("Units:"),
        units_label(app)
    );
    display_opt_field!(
        "  ",
        "Constraints:",
        app.constraints.as_deref().map(normalized_constraints)
    );
    if app.expose {
        println!(
            "  {} {}",
            Style::new().bold().apply_to("Exposed:"),
            Style::new().green().apply_to("yes")
        );
    }

    if !app.to.is_empty() {
        println!("  {}", Style::new().bold().apply_to("Placement:"));
        for (unit, directive) in app.to.iter().enumerate() {
            println!(
                "    {} {}",
                Style::new().cyan().apply_to(format!("{name}/{unit}")),
                directive
            );
        }
    }

    if !app.options.is_empty() {
        println!("  {}", Style::new().bold().apply_to("Options:"));
        for (key, value) in &app.options {
            println!("    {}: {}", Style::new().cyan().apply_to(key), value);
        }
    }

    if !app.bindings.is_empty() {
        println!("  {}", Style::new().bold().apply_to("Bindings:"));
        for (endpoint, space) in &app.bindings {
            let endpoint = if endpoint.is_empty() {
                "(default)"
            } else {
                endpoint.as_str()
            };
            println!("    {}: {}", Style::new().cyan().apply_to(endpoint), space);
        }
    }

    let relations: Vec<&Relation> = bundle.relations_of(name).collect();
    if !relations.is_empty() {
        println!("  {}", Style::new().bold().apply_to("Relations:"));
        for peer in relations.iter().filter_map(|r| r.peer_of(name)) {
            println!("    {} {}", Style::new().dim().apply_to("->"), peer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_label() {
        assert_eq!(units_label(&Application::new("ovn-chassis")), "subordinate");
        let app = Application {
            num_units: Some(3),
            ..Application::new("keystone")
        };
        assert_eq!(units_label(&app), "3 unit(s)");
    }

    #[test]
    fn test_normalized_constraints() {
        assert_eq!(normalized_constraints("mem=8192M cores=4"), "cores=4 mem=8G");
        assert_eq!(normalized_constraints("mem=lots"), "mem=lots");
    }

    #[test]
    fn test_charm_label_marks_local_charms() {
        assert_eq!(charm_label(&Application::new("./charms/octavia")), "./charms/octavia (local)");
        assert_eq!(charm_label(&Application::new("ch:keystone")), "ch:keystone");
    }
}
