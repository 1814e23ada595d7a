use clap::Parser;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Johannes Karwanoupoulos, Åsmund Kaupang",
    version,
    about = "MACHA - Prepares CHARMM inputs (segment CRD files, topology streams and patched scripts) for ligand free-energy simulations.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Ligand id to prepare. Every structure file in the original folder is
    /// prepared when omitted.
    #[arg(value_name = "LIGAND")]
    pub ligand: Option<String>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the original and ligands folders. Defaults to the
    /// current directory.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub parent_dir: Option<PathBuf>,

    /// Path to the CGenFF executable. `PATH` is searched otherwise.
    #[arg(long, value_name = "PATH", conflicts_with = "no_cgenff")]
    pub cgenff: Option<PathBuf>,

    /// Skip ligand parametrization with CGenFF.
    #[arg(long)]
    pub no_cgenff: bool,

    /// Write a CSV table of all atoms next to the CRD files.
    #[arg(long)]
    pub atom_table: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S charmm.run=true
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
