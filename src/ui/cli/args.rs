// Wed Jan 15 2026 - Alex

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "layout-modeler")]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Deterministic class layout modeling for recovered type hierarchies", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true, default_value = "warn")]
    pub log_level: String,

    /// JSON file with a LayoutConfig.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub json: bool,

    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the built-in reference hierarchy.
    Sample(ReportArgs),
    /// Resolve a JSON fact sheet.
    Resolve(ResolveArgs),
    /// Compare two fact sheets class by class.
    Diff(DiffArgs),
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Only print this class.
    #[arg(long)]
    pub class: Option<String>,

    /// Exit non-zero on any finding or dropped hierarchy.
    #[arg(long)]
    pub strict: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ResolveArgs {
    pub facts: PathBuf,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(ClapArgs, Debug)]
pub struct DiffArgs {
    pub old: PathBuf,
    pub new: PathBuf,
}
