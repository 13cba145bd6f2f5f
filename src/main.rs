//! Entry point for the sectab tool.
//!
//! This file handles high-level application flow:
//! 1. Parse command-line arguments using `clap` and set up `tracing`.
//! 2. Map the input file and identify it as a Mach-O image.
//! 3. Walk the load commands, then build the section table from the segments.
//! 4. Print the table, or dump one section's contents.
//!
//! Error handling is done via `anyhow`.

use anyhow::{Context, Result};
use clap::Parser;
use memmap2::Mmap;
use std::fs::File;
use std::io::Cursor;
use tracing_subscriber::EnvFilter;

use sectab::config::Config;
use sectab::utils::hexdump;
use sectab::{macho, Handle, SectionTable};

fn main() -> Result<()> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level).context("invalid log level")?)
        .with_writer(std::io::stderr)
        .init();

    let path = &config.input;
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mmap = unsafe { Mmap::map(&file)? };

    let image = macho::parse(&mmap).with_context(|| format!("failed to parse {}", path.display()))?;

    let handle = Handle::new(Cursor::new(&mmap[..]), image.endian).share();
    let table =
        SectionTable::build(&handle, &image.segments).context("failed to read section headers")?;

    if let Some(target) = &config.dump {
        let (segment, section) = target
            .split_once(',')
            .with_context(|| format!("expected SEGMENT,SECTION, got {:?}", target))?;
        let found = table
            .find(segment, section)
            .with_context(|| format!("no section named {}", target))?;
        let data = table
            .section_data(found.index())?
            .context("section index out of range")?;
        println!("{:#}", found);
        for line in hexdump(&data, found.address()) {
            println!("{}", line);
        }
        return Ok(());
    }

    if config.verbose {
        for (index, record) in table.iter().enumerate() {
            println!("Section {}:\n{:#}\n", index, record);
        }
    } else {
        print!("{}", table);
    }
    Ok(())
}
