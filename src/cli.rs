use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "autotitle")]
#[command(author, version, about, long_about = None)]
#[command(about = "Rename episode files using series metadata and filename patterns")]
pub struct Args {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rename the episode files of one or more directories
    Rename(RenameArgs),

    /// Suggest input patterns for the files of a directory
    Guess(GuessArgs),
}

#[derive(ClapArgs, Debug)]
pub struct RenameArgs {
    /// Directories containing episode files
    #[arg(required_unless_present = "targets")]
    pub dirs: Vec<PathBuf>,

    /// JSON file with episode metadata
    #[arg(short, long, value_name = "FILE")]
    pub media: PathBuf,

    /// Input pattern, e.g. "[Sub] {{SERIES}} - {{EP_NUM}}.{{EXT}}" (repeatable)
    #[arg(short, long = "input", value_name = "PATTERN", required_unless_present = "targets")]
    pub inputs: Vec<String>,

    /// Output field: SERIES, SERIES_EN, SERIES_JP, EP_NUM, EP_NAME, FILLER, RES,
    /// "+" to glue neighbours, anything else is literal text (repeatable)
    #[arg(
        short,
        long = "field",
        value_name = "FIELD",
        default_values = ["SERIES", "EP_NUM", "FILLER", "EP_NAME"]
    )]
    pub fields: Vec<String>,

    /// Text placed between output fields
    #[arg(short, long, default_value = " - ")]
    pub separator: String,

    /// Added to the parsed episode number before lookup
    #[arg(short, long, default_value = "0", allow_negative_numbers = true)]
    pub offset: i64,

    /// Minimum episode number width (0 uses the default of 2)
    #[arg(short, long, default_value = "0")]
    pub padding: usize,

    /// JSON file listing targets with their own patterns, instead of DIRS and --input
    #[arg(long, value_name = "FILE", conflicts_with_all = ["dirs", "inputs"])]
    pub targets: Option<PathBuf>,

    /// Simulate changes without modifying the filesystem
    #[arg(short, long)]
    pub dry: bool,

    /// Copy originals into a backup directory inside each target before renaming
    #[arg(short, long, value_name = "DIR", num_args = 0..=1)]
    pub backup: Option<Option<PathBuf>>,

    /// Comma-separated media extensions (defaults to AUTOTITLE_FORMATS)
    #[arg(long, value_name = "EXTS")]
    pub formats: Option<String>,

    /// Worker threads when renaming several directories
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Print the plan as tab-separated lines for scripting
    #[arg(long, requires = "dry")]
    pub simple: bool,
}

#[derive(ClapArgs, Debug)]
pub struct GuessArgs {
    /// Directory containing episode files
    pub dir: PathBuf,

    /// Comma-separated media extensions (defaults to AUTOTITLE_FORMATS)
    #[arg(long, value_name = "EXTS")]
    pub formats: Option<String>,
}
