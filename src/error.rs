//! Error type shared by the decoding layers.

use std::io;
use thiserror::Error;

/// Everything that can go wrong while reading section tables.
///
/// None of these are recoverable at this layer: a failed build never yields
/// a partial table.
#[derive(Debug, Error)]
pub enum Error {
    #[error("short read at 0x{position:x}: expected {expected} bytes")]
    ShortRead { position: u64, expected: u64 },

    #[error("cannot seek to 0x{position:x}")]
    SeekFailure {
        position: u64,
        #[source]
        source: io::Error,
    },

    #[error("section array of segment at 0x{position:x} (header size 0x{size:x}) is past the addressable range")]
    PositionOverflow { position: u64, size: u64 },

    #[error("cannot query stream position")]
    Position(#[source] io::Error),

    #[error("unsupported segment load command 0x{0:x}")]
    UnsupportedVariant(u32),

    #[error("read failed at 0x{position:x}")]
    Read {
        position: u64,
        #[source]
        source: io::Error,
    },

    #[error("stream handle is in use by another operation")]
    HandleInUse,

    #[error("not a Mach-O image (magic 0x{0:08x})")]
    BadMagic(u32),

    #[error("malformed Mach-O image")]
    Parse(#[from] object::read::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
