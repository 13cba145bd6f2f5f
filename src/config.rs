//! Configuration module.
//!
//! This module defines the command-line interface (CLI) for `sectab` using `clap`.

use clap::Parser;
use std::path::PathBuf;

/// Lists the section headers of a Mach-O image.
///
/// Walks the segment load commands of a thin (non-universal) 32- or 64-bit
/// Mach-O file and prints every section they declare, in file order.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Input Mach-O file
    pub input: PathBuf,

    /// Print every section in the multi-line form
    #[arg(short, long)]
    pub verbose: bool,

    /// Hex dump the contents of one section, given as SEGMENT,SECTION
    #[arg(long, value_name = "SEGMENT,SECTION")]
    pub dump: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: String,
}
