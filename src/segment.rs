//! Segment views.
//!
//! The section table builder only needs four facts about each segment: where
//! its load command starts, how big the fixed part of that command is, how
//! many section headers follow it, and whether they are 32- or 64-bit.
//! [`SegmentView`] is that contract; [`Segment`] is the implementation the
//! Mach-O front end produces.

use object::macho::{SegmentCommand32, SegmentCommand64, LC_SEGMENT, LC_SEGMENT_64};
use object::Endianness;
use std::fmt;
use std::mem;

use crate::error::{Error, Result};
use crate::layout::FixedName;

/// Bit width of a segment and of the section headers it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Bits32,
    Bits64,
}

impl Variant {
    /// Maps a segment load command to its width.
    pub fn from_command(cmd: u32) -> Result<Self> {
        match cmd {
            LC_SEGMENT => Ok(Self::Bits32),
            LC_SEGMENT_64 => Ok(Self::Bits64),
            other => Err(Error::UnsupportedVariant(other)),
        }
    }

    pub fn command(self) -> u32 {
        match self {
            Self::Bits32 => LC_SEGMENT,
            Self::Bits64 => LC_SEGMENT_64,
        }
    }

    /// Size of the fixed segment command that precedes the section array.
    pub fn segment_header_size(self) -> u64 {
        match self {
            Self::Bits32 => mem::size_of::<SegmentCommand32<Endianness>>() as u64,
            Self::Bits64 => mem::size_of::<SegmentCommand64<Endianness>>() as u64,
        }
    }
}

/// What the section table builder needs to know about one segment.
pub trait SegmentView {
    /// Stream position of the segment's load command.
    fn header_position(&self) -> u64;

    /// Byte size of the fixed part of the load command.
    fn header_size(&self) -> u64;

    /// Number of section headers following the fixed part.
    fn section_count(&self) -> u32;

    /// The raw load command (`LC_SEGMENT` or `LC_SEGMENT_64`).
    fn command(&self) -> u32;

    fn variant(&self) -> Result<Variant> {
        Variant::from_command(self.command())
    }
}

/// A segment load command, widened to 64-bit fields, plus where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Segment name, e.g. `__TEXT`.
    pub name: FixedName,
    /// Virtual address the segment is mapped at.
    pub vm_address: u64,
    /// Size of the mapping in memory.
    pub vm_size: u64,
    /// File offset of the mapped bytes.
    pub file_offset: u64,
    /// Number of bytes mapped from the file.
    pub file_size: u64,
    /// Maximum VM protection.
    pub max_protection: u32,
    /// Initial VM protection.
    pub initial_protection: u32,
    /// Number of section headers following the command.
    pub section_count: u32,
    /// Segment flags.
    pub flags: u32,
    /// Stream position of the load command.
    pub position: u64,
    /// Width of the command and its section headers.
    pub variant: Variant,
}

impl Segment {
    pub fn from_command32(cmd: &SegmentCommand32<Endianness>, endian: Endianness, position: u64) -> Self {
        Self {
            name: FixedName(cmd.segname),
            vm_address: cmd.vmaddr.get(endian).into(),
            vm_size: cmd.vmsize.get(endian).into(),
            file_offset: cmd.fileoff.get(endian).into(),
            file_size: cmd.filesize.get(endian).into(),
            max_protection: cmd.maxprot.get(endian),
            initial_protection: cmd.initprot.get(endian),
            section_count: cmd.nsects.get(endian),
            flags: cmd.flags.get(endian),
            position,
            variant: Variant::Bits32,
        }
    }

    pub fn from_command64(cmd: &SegmentCommand64<Endianness>, endian: Endianness, position: u64) -> Self {
        Self {
            name: FixedName(cmd.segname),
            vm_address: cmd.vmaddr.get(endian),
            vm_size: cmd.vmsize.get(endian),
            file_offset: cmd.fileoff.get(endian),
            file_size: cmd.filesize.get(endian),
            max_protection: cmd.maxprot.get(endian),
            initial_protection: cmd.initprot.get(endian),
            section_count: cmd.nsects.get(endian),
            flags: cmd.flags.get(endian),
            position,
            variant: Variant::Bits64,
        }
    }
}

impl SegmentView for Segment {
    fn header_position(&self) -> u64 {
        self.position
    }

    fn header_size(&self) -> u64 {
        self.variant.segment_header_size()
    }

    fn section_count(&self) -> u32 {
        self.section_count
    }

    fn command(&self) -> u32 {
        self.variant.command()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vm 0x{:x}+0x{:x} file 0x{:x}+0x{:x} ({} sections)",
            self.name, self.vm_address, self.vm_size, self.file_offset, self.file_size, self.section_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object::endian::{U32, U64};

    #[test]
    fn command_sizes() {
        assert_eq!(Variant::Bits32.segment_header_size(), 56);
        assert_eq!(Variant::Bits64.segment_header_size(), 72);
    }

    #[test]
    fn variant_from_command() {
        assert_eq!(Variant::from_command(LC_SEGMENT).unwrap(), Variant::Bits32);
        assert_eq!(Variant::from_command(LC_SEGMENT_64).unwrap(), Variant::Bits64);
        assert!(matches!(Variant::from_command(0x2), Err(Error::UnsupportedVariant(0x2))));
    }

    #[test]
    fn segment_view_of_64bit_command() {
        let e = Endianness::Big;
        let cmd = SegmentCommand64 {
            cmd: U32::new(e, LC_SEGMENT_64),
            cmdsize: U32::new(e, 72 + 80),
            segname: FixedName::new("__TEXT").0,
            vmaddr: U64::new(e, 0x1_0000_0000),
            vmsize: U64::new(e, 0x4000),
            fileoff: U64::new(e, 0),
            filesize: U64::new(e, 0x4000),
            maxprot: U32::new(e, 5),
            initprot: U32::new(e, 5),
            nsects: U32::new(e, 1),
            flags: U32::new(e, 0),
        };
        let segment = Segment::from_command64(&cmd, e, 32);
        assert_eq!(segment.name.as_str(), "__TEXT");
        assert_eq!(segment.vm_address, 0x1_0000_0000);
        assert_eq!(segment.header_position(), 32);
        assert_eq!(segment.header_size(), 72);
        assert_eq!(segment.section_count(), 1);
        assert_eq!(segment.variant().unwrap(), Variant::Bits64);
    }
}
