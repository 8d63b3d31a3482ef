use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "titlefix",
    version,
    about = "Repair mangled scanned-paper PDF filenames"
)]
pub struct Cli {
    /// Directory containing the scanned PDF files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory (defaults to a repair subdirectory under the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
