//! charmbundle - charm bundle checker
//!
//! Command line entry point; see the library crate for the bundle model
//! and checks.

use clap::Parser;

use charmbundle::cli::{Cli, Commands};
use charmbundle::{commands, logging};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::run(cli.config, args),
        Commands::List(args) => commands::list::run(args),
        Commands::Show(args) => commands::show::run(args),
        Commands::Render(args) => commands::render::run(args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
