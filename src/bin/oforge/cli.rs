use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use opls_forge::DEFAULT_MAX_PASSES;
use opls_forge::io::Format;

#[derive(Parser)]
#[command(
    name = "oforge",
    about = "Rule-based OPLS-AA atom typing",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Assign OPLS-AA atom types to a small molecule (MOL2/SDF)
    #[command(visible_alias = "t")]
    Type(TypeArgs),

    /// Build a rule catalog and report precedence problems
    #[command(visible_alias = "r")]
    Rules(RulesArgs),
}

impl Command {
    pub fn quiet(&self) -> bool {
        match self {
            Command::Type(args) => args.io.quiet,
            Command::Rules(args) => args.quiet,
        }
    }
}

/// I/O options for the typing command.
#[derive(Args)]
pub struct IoOptions {
    /// Input file (stdin if omitted, requires --infmt)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Typed MOL2 output file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
#[command(next_help_heading = "Typing")]
pub struct TypingOptions {
    /// Custom typing rules (TOML file)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Maximum number of rule passes before giving up on convergence
    #[arg(long = "max-passes", value_name = "N", default_value_t = DEFAULT_MAX_PASSES)]
    pub max_passes: usize,

    /// Write every surviving candidate instead of a single type
    #[arg(long)]
    pub debug: bool,
}

#[derive(Args)]
pub struct TypeArgs {
    #[command(flatten)]
    pub io: IoOptions,

    /// Input format (inferred from extension if not specified)
    #[arg(long = "infmt", value_name = "FORMAT")]
    pub input_format: Option<InputFormat>,

    #[command(flatten)]
    pub typing: TypingOptions,
}

#[derive(Args)]
pub struct RulesArgs {
    /// Rule table to check (built-in OPLS-AA table if omitted)
    #[arg(long, value_name = "FILE")]
    pub rules: Option<PathBuf>,

    /// Suppress tables (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum InputFormat {
    Mol2,
    Sdf,
}

impl From<InputFormat> for Format {
    fn from(fmt: InputFormat) -> Self {
        match fmt {
            InputFormat::Mol2 => Format::Mol2,
            InputFormat::Sdf => Format::Sdf,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
