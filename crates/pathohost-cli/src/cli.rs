use clap::{Args, Parser, Subcommand, ValueEnum};
use pathohost::viewer::scene::RenderStyle;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "PathoHost CLI - Search pathogen structures on RCSB, dock small molecules against host proteins with AutoDock Vina, and view the resulting poses.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    /// Defaults to `pathohost.toml` in the platform config directory, if present.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S docking.exhaustiveness=16
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", global = true)]
    pub set_values: Vec<String>,

    /// Directory for staged inputs and docking output (default: ./data).
    #[arg(long, global = true, value_name = "PATH")]
    pub scratch_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search RCSB PDB for entries from a source organism.
    Search(SearchArgs),
    /// Download an entry from RCSB PDB into the scratch directory.
    Fetch(FetchArgs),
    /// Dock a small molecule against a host protein with AutoDock Vina.
    Dock(DockArgs),
    /// Re-extract, score and convert poses from the last docking output.
    Poses(PosesArgs),
    /// Write an interactive 3D view as a standalone HTML page.
    View(ViewArgs),
}

/// Arguments for the `search` subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Organism name to match exactly against the source-organism lineage (e.g., 'SARS-CoV-2').
    #[arg(required = true, value_name = "ORGANISM")]
    pub organism: String,

    /// Maximum number of entries to return.
    #[arg(short = 'n', long, value_name = "INT")]
    pub max_results: Option<usize>,

    /// Print results as JSON instead of a table.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `fetch` subcommand.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Four-character PDB identifier (case-insensitive).
    #[arg(required = true, value_name = "PDB_ID")]
    pub pdb_id: String,

    /// Number of characters of the file to print as a preview (0 disables it).
    #[arg(long, default_value_t = 1000, value_name = "INT")]
    pub preview: usize,

    /// Also write a 3D view of the structure to this HTML file.
    #[arg(long, value_name = "PATH")]
    pub view: Option<PathBuf>,

    /// Rendering style for --view.
    #[arg(long, default_value_t = RenderStyle::Cartoon, value_parser = parse_render_style)]
    pub style: RenderStyle,
}

/// How the receptor for docking is supplied.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ReceptorSource {
    /// Host protein structure file in PDB format.
    #[arg(short, long, value_name = "PATH")]
    pub receptor: Option<PathBuf>,

    /// Fetch the host protein from RCSB PDB by identifier.
    #[arg(long, value_name = "PDB_ID")]
    pub pdb_id: Option<String>,
}

/// Rule for recognising score rows in the docking engine's output.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMatchArg {
    /// Rows whose first character is one of the configured rank digits.
    Digits,
    /// Every row of the result table.
    Table,
}

/// Docking overrides shared by commands that run or re-read a docking job.
#[derive(Args, Debug, Default)]
pub struct DockingOverrides {
    /// Path to the AutoDock Vina executable.
    #[arg(long, value_name = "PATH")]
    pub vina_path: Option<PathBuf>,

    /// Path to the Open Babel `obabel` executable.
    #[arg(long, value_name = "PATH")]
    pub obabel_path: Option<PathBuf>,

    /// How score rows are recognised in the docking output.
    #[arg(long, value_enum, value_name = "RULE")]
    pub rank_match: Option<RankMatchArg>,
}

/// Arguments for the `dock` subcommand.
#[derive(Args, Debug)]
pub struct DockArgs {
    #[command(flatten)]
    pub receptor: ReceptorSource,

    /// Ligand structure file in SDF or MOL format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub ligand: PathBuf,

    /// Search box center as 'x,y,z' in Ångström.
    #[arg(long, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub center: Option<String>,

    /// Search box edge lengths as 'x,y,z' in Ångström.
    #[arg(long, value_name = "X,Y,Z")]
    pub size: Option<String>,

    /// Override the search exhaustiveness.
    #[arg(short, long, value_name = "INT")]
    pub exhaustiveness: Option<u32>,

    /// Override the maximum number of binding modes.
    #[arg(short, long, value_name = "INT")]
    pub num_modes: Option<u32>,

    #[command(flatten)]
    pub overrides: DockingOverrides,

    /// Write scores, poses and the docked complex into this directory.
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,

    /// Write a 3D view of the best pose on its receptor to this HTML file.
    #[arg(long, value_name = "PATH")]
    pub view: Option<PathBuf>,
}

/// Arguments for the `poses` subcommand.
#[derive(Args, Debug)]
pub struct PosesArgs {
    /// Multi-model docking output (default: <scratch>/docked_output.pdbqt).
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Saved docking standard output to read scores from (default: <scratch>/docking_log.txt).
    #[arg(long, value_name = "PATH")]
    pub scores_log: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: DockingOverrides,

    /// Write scores, poses and the docked complex into this directory.
    #[arg(long, value_name = "DIR")]
    pub export: Option<PathBuf>,
}

/// Arguments for the `view` subcommand.
#[derive(Args, Debug)]
pub struct ViewArgs {
    #[command(subcommand)]
    pub command: ViewCommands,

    /// HTML file to write.
    #[arg(short, long, global = true, default_value = "pathohost-view.html", value_name = "PATH")]
    pub output: PathBuf,
}

/// Available views.
#[derive(Subcommand, Debug)]
pub enum ViewCommands {
    /// A single structure in one rendering style.
    Structure {
        /// Structure file in PDB format.
        #[arg(required = true, value_name = "PATH")]
        path: PathBuf,

        /// Rendering style.
        #[arg(long, default_value_t = RenderStyle::Cartoon, value_parser = parse_render_style)]
        style: RenderStyle,
    },
    /// Receptor and docked ligand together.
    Complex {
        /// Receptor in PDB format (default: <scratch>/receptor.pdb).
        #[arg(long, value_name = "PATH")]
        receptor: Option<PathBuf>,

        /// Docked ligand (default: <scratch>/docked_output.pdbqt).
        #[arg(long, value_name = "PATH")]
        ligand: Option<PathBuf>,
    },
    /// One docked pose on its receptor.
    Pose {
        /// 1-based pose number.
        #[arg(long, default_value_t = 1, value_name = "INT")]
        pose: usize,

        /// Text of the pose label (default: 'Pose N').
        #[arg(long, value_name = "TEXT")]
        label: Option<String>,

        /// Label every ligand atom with its name and residue.
        #[arg(long)]
        atom_labels: bool,

        /// Path to the Open Babel `obabel` executable.
        #[arg(long, value_name = "PATH")]
        obabel_path: Option<PathBuf>,
    },
}

fn parse_render_style(s: &str) -> Result<RenderStyle, String> {
    s.parse()
}
