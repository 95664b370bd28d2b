//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::CONFIG_ENV;

/// charmbundle - charm bundle checker
///
/// Load, validate and inspect charm deployment bundles.
#[derive(Parser, Debug)]
#[command(
    name = "charmbundle",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Load, validate and inspect charm deployment bundles",
    long_about = "charmbundle reads charm deployment bundles (machines, applications and relations), \
                  resolves anchors, includes and overlays, and checks that placements, unit counts \
                  and relations are consistent before the bundle reaches an orchestrator.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  charmbundle validate bundle.yaml\n    \
                  charmbundle validate bundles/ --strict\n    \
                  charmbundle list bundle.yaml machines --detailed\n    \
                  charmbundle show bundle.yaml nova-compute\n    \
                  charmbundle render bundle.yaml --overlay overlays/ha.yaml"
)]
pub struct Cli {
    /// Check configuration file (defaults to ./.charmbundle.yaml)
    #[arg(long, short = 'c', global = true, env = CONFIG_ENV, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check bundles for consistency
    Validate(ValidateArgs),

    /// List machines, applications or relations
    List(ListArgs),

    /// Show one application
    Show(ShowArgs),

    /// Print the fully resolved bundle
    Render(RenderArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format for reports
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Output format for rendered bundles
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderFormat {
    #[default]
    Yaml,
    Json,
}

/// What to list
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListKind {
    Machines,
    #[default]
    Applications,
    Relations,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Validate a bundle:\n    charmbundle validate bundle.yaml\n\n\
                  Validate every bundle in a directory:\n    charmbundle validate tests/bundles\n\n\
                  Validate with an overlay applied:\n    charmbundle validate bundle.yaml --overlay overlay.yaml\n\n\
                  Treat warnings as errors:\n    charmbundle validate bundle.yaml --strict\n\n\
                  Skip rules:\n    charmbundle validate bundle.yaml --ignore machine-unused --ignore 'relation-*'\n\n\
                  Machine readable output:\n    charmbundle validate bundle.yaml --format json")]
pub struct ValidateArgs {
    /// Bundle files or directories to check
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Overlay files applied to every bundle, in order
    #[arg(long = "overlay", short = 'o', value_name = "FILE")]
    pub overlays: Vec<PathBuf>,

    /// Report warnings as errors
    #[arg(long)]
    pub strict: bool,

    /// Rule codes to skip (glob patterns allowed)
    #[arg(long, value_name = "RULE")]
    pub ignore: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List applications:\n    charmbundle list bundle.yaml\n\n\
                  List machines and what runs on them:\n    charmbundle list bundle.yaml machines --detailed\n\n\
                  List relations of OVN applications:\n    charmbundle list bundle.yaml relations --filter 'ovn-*'")]
pub struct ListArgs {
    /// Bundle file
    pub bundle: PathBuf,

    /// What to list
    #[arg(value_enum, default_value_t = ListKind::Applications)]
    pub kind: ListKind,

    /// Only entries whose name matches this glob (either side for relations)
    #[arg(long, value_name = "GLOB")]
    pub filter: Option<String>,

    /// Show detailed output
    #[arg(long)]
    pub detailed: bool,

    /// Overlay files applied before listing, in order
    #[arg(long = "overlay", short = 'o', value_name = "FILE")]
    pub overlays: Vec<PathBuf>,
}

/// Arguments for the show command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show an application:\n    charmbundle show bundle.yaml nova-compute\n\n\
                  Pick an application interactively:\n    charmbundle show bundle.yaml")]
pub struct ShowArgs {
    /// Bundle file
    pub bundle: PathBuf,

    /// Application name to show
    pub name: Option<String>,

    /// Overlay files applied before showing, in order
    #[arg(long = "overlay", short = 'o', value_name = "FILE")]
    pub overlays: Vec<PathBuf>,
}

/// Arguments for the render command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Expand anchors and includes:\n    charmbundle render bundle.yaml\n\n\
                  Apply overlays and print JSON:\n    charmbundle render bundle.yaml -o ha.yaml --format json")]
pub struct RenderArgs {
    /// Bundle file
    pub bundle: PathBuf,

    /// Overlay files applied before rendering, in order
    #[arg(long = "overlay", short = 'o', value_name = "FILE")]
    pub overlays: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = RenderFormat::Yaml)]
    pub format: RenderFormat,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    charmbundle completions --shell bash > ~/.bash_completion.d/charmbundle\n\n\
                  Generate zsh completions:\n    charmbundle completions --shell zsh > ~/.zfunc/_charmbundle\n\n\
                  Generate fish completions:\n    charmbundle completions --shell fish > ~/.config/fish/completions/charmbundle.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long, short = 's')]
    pub shell: String,
}
