//! List command implementation

use console::Style;

use crate::cli::{ListArgs, ListKind};
use crate::commands::helpers::{self, NameFilter};
use crate::error::Result;
use crate::model::Bundle;
use crate::ui::display;

/// Run list command
pub fn run(args: ListArgs) -> Result<()> {
    let filter = NameFilter::new(args.filter.as_deref())?;
    let bundle = helpers::load_bundle(&args.bundle, &args.overlays)?;

    match args.kind {
        ListKind::Applications => list_applications(&bundle, &filter, args.detailed),
        ListKind::Machines => list_machines(&bundle, &filter, args.detailed),
        ListKind::Relations => list_relations(&bundle, &filter),
    }

    Ok(())
}

fn print_heading(label: &str, count: usize) {
    println!("{} ({}):", Style::new().bold().apply_to(label), count);
}

fn list_applications(bundle: &Bundle, filter: &NameFilter<'_>, detailed: bool) {
    let selected: Vec<_> = bundle
        .applications
        .iter()
        .filter(|(name, _)| filter.matches(name))
        .collect();
    if selected.is_empty() {
        println!("No applications found.");
        return;
    }

    print_heading("Applications", selected.len());
    for (name, app) in selected {
        display::display_application_line(name, app, detailed);
    }
}

fn list_machines(bundle: &Bundle, filter: &NameFilter<'_>, detailed: bool) {
    let units = bundle.units_by_machine();
    let selected: Vec<_> = bundle
        .machines
        .iter()
        .filter(|(id, _)| filter.matches(id.as_str()))
        .collect();
    if selected.is_empty() {
        println!("No machines found.");
        return;
    }

    print_heading("Machines", selected.len());
    for (id, machine) in selected {
        let hosted = units.get(id).map_or(&[][..], Vec::as_slice);
        display::display_machine_line(id, machine, hosted, detailed);
    }
}

fn list_relations(bundle: &Bundle, filter: &NameFilter<'_>) {
    let selected: Vec<_> = bundle
        .relations
        .iter()
        .filter(|relation| {
            let (left, right) = relation.applications();
            filter.matches(left) || filter.matches(right)
        })
        .collect();
    if selected.is_empty() {
        println!("No relations found.");
        return;
    }

    print_heading("Relations", selected.len());
    for relation in selected {
        display::display_relation_line(relation);
    }
}
