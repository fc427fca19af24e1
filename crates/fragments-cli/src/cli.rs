use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fragments",
    about = "Store fragments and convert them between formats",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List supported media types and their extensions
    Types,
    /// List the types a media type can be converted to
    Formats(FormatsArgs),
    /// Store a file as a fragment and show its metadata
    Inspect(InspectArgs),
    /// Convert a file into another format
    Convert(ConvertArgs),
}

#[derive(Args)]
pub struct FormatsArgs {
    /// Media type, e.g. text/markdown
    pub media_type: String,
}

#[derive(Args)]
pub struct InspectArgs {
    pub file: PathBuf,
    /// Declared media type; inferred from the file extension if omitted
    #[arg(short = 't', long = "type")]
    pub media_type: Option<String>,
    /// Owner the fragment is stored under
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Args)]
pub struct ConvertArgs {
    pub file: PathBuf,
    /// Target extension, e.g. html, yaml, webp
    #[arg(long)]
    pub to: String,
    /// Declared media type; inferred from the file extension if omitted
    #[arg(short = 't', long = "type")]
    pub media_type: Option<String>,
    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Owner the fragment is stored under
    #[arg(long)]
    pub owner: Option<String>,
}
