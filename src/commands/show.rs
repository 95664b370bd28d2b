//! Show command implementation

use inquire::Select;
use tracing::debug;

use crate::cli::ShowArgs;
use crate::commands::helpers;
use crate::error::{CharmbundleError, Result, bundle};
use crate::model::Bundle;
use crate::ui::display;

pub fn run(args: ShowArgs) -> Result<()> {
    let loaded = helpers::load_bundle(&args.bundle, &args.overlays)?;

    let name = match args.name {
        Some(name) => name,
        None if console::user_attended() => match select_application_interactively(&loaded)? {
            Some(name) => name,
            None => return Ok(()),
        },
        None => return Err(CharmbundleError::ApplicationNameRequired),
    };

    let app = loaded
        .application(&name)
        .ok_or_else(|| bundle::application_not_found(&name))?;
    display::display_application(&loaded, &name, app);

    Ok(())
}

/// Let the user pick an application; `None` when cancelled or empty
fn select_application_interactively(loaded: &Bundle) -> Result<Option<String>> {
    if loaded.applications.is_empty() {
        println!("No applications in bundle.");
        return Ok(None);
    }

    let items: Vec<String> = loaded.applications.keys().cloned().collect();
    debug!(count = items.len(), "prompting for application");

    let selection = Select::new("Select application to show", items)
        .with_starting_cursor(0)
        .with_page_size(10)
        .with_help_message("↑↓ to move, type to filter, ENTER to select, ESC to cancel")
        .prompt_skippable()?;

    Ok(selection)
}
