//! Section header records.
//!
//! A section header comes in two layouts that share field order and differ
//! only in the width of `addr` and `size` (plus a trailing reserved word in
//! the 64-bit form). [`SectionRecord`] wraps both so callers read fields the
//! same way regardless of width.

use object::macho::{
    SECTION_ATTRIBUTES, SECTION_TYPE, S_GB_ZEROFILL, S_THREAD_LOCAL_ZEROFILL, S_ZEROFILL,
};
use std::fmt;

use crate::layout::{Field, FieldReader, FieldWriter, FixedName, Layout, NAME_LEN};
use crate::segment::Variant;

/// `section` as stored on disk (68 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section32 {
    /// Section name, e.g. `__text`.
    pub sectname: FixedName,
    /// Name of the owning segment.
    pub segname: FixedName,
    /// Virtual address of the section.
    pub addr: u32,
    /// Size of the section contents in bytes.
    pub size: u32,
    /// File offset of the contents.
    pub offset: u32,
    /// Alignment as a power-of-two exponent.
    pub align: u32,
    /// File offset of the first relocation entry.
    pub reloff: u32,
    /// Number of relocation entries.
    pub nreloc: u32,
    /// Section type (low byte) and attributes.
    pub flags: u32,
    /// Type-specific: index or count, meaning depends on the section type.
    pub reserved1: u32,
    /// Type-specific: stub size or count.
    pub reserved2: u32,
}

impl Layout for Section32 {
    const FIELDS: &'static [Field] = &[
        Field::new("sectname", NAME_LEN),
        Field::new("segname", NAME_LEN),
        Field::new("addr", 4),
        Field::new("size", 4),
        Field::new("offset", 4),
        Field::new("align", 4),
        Field::new("reloff", 4),
        Field::new("nreloc", 4),
        Field::new("flags", 4),
        Field::new("reserved1", 4),
        Field::new("reserved2", 4),
    ];

    fn decode(f: &mut FieldReader<'_>) -> Self {
        Self {
            sectname: f.name(),
            segname: f.name(),
            addr: f.u32(),
            size: f.u32(),
            offset: f.u32(),
            align: f.u32(),
            reloff: f.u32(),
            nreloc: f.u32(),
            flags: f.u32(),
            reserved1: f.u32(),
            reserved2: f.u32(),
        }
    }

    fn encode(&self, f: &mut FieldWriter<'_>) {
        f.name(&self.sectname);
        f.name(&self.segname);
        f.u32(self.addr);
        f.u32(self.size);
        f.u32(self.offset);
        f.u32(self.align);
        f.u32(self.reloff);
        f.u32(self.nreloc);
        f.u32(self.flags);
        f.u32(self.reserved1);
        f.u32(self.reserved2);
    }
}

/// `section_64` as stored on disk (80 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section64 {
    /// Section name, e.g. `__text`.
    pub sectname: FixedName,
    /// Name of the owning segment.
    pub segname: FixedName,
    /// Virtual address of the section.
    pub addr: u64,
    /// Size of the section contents in bytes.
    pub size: u64,
    /// File offset of the contents.
    pub offset: u32,
    /// Alignment as a power-of-two exponent.
    pub align: u32,
    /// File offset of the first relocation entry.
    pub reloff: u32,
    /// Number of relocation entries.
    pub nreloc: u32,
    /// Section type (low byte) and attributes.
    pub flags: u32,
    /// Type-specific: index or count, meaning depends on the section type.
    pub reserved1: u32,
    /// Type-specific: stub size or count.
    pub reserved2: u32,
    /// Unused.
    pub reserved3: u32,
}

impl Layout for Section64 {
    const FIELDS: &'static [Field] = &[
        Field::new("sectname", NAME_LEN),
        Field::new("segname", NAME_LEN),
        Field::new("addr", 8),
        Field::new("size", 8),
        Field::new("offset", 4),
        Field::new("align", 4),
        Field::new("reloff", 4),
        Field::new("nreloc", 4),
        Field::new("flags", 4),
        Field::new("reserved1", 4),
        Field::new("reserved2", 4),
        Field::new("reserved3", 4),
    ];

    fn decode(f: &mut FieldReader<'_>) -> Self {
        Self {
            sectname: f.name(),
            segname: f.name(),
            addr: f.u64(),
            size: f.u64(),
            offset: f.u32(),
            align: f.u32(),
            reloff: f.u32(),
            nreloc: f.u32(),
            flags: f.u32(),
            reserved1: f.u32(),
            reserved2: f.u32(),
            reserved3: f.u32(),
        }
    }

    fn encode(&self, f: &mut FieldWriter<'_>) {
        f.name(&self.sectname);
        f.name(&self.segname);
        f.u64(self.addr);
        f.u64(self.size);
        f.u32(self.offset);
        f.u32(self.align);
        f.u32(self.reloff);
        f.u32(self.nreloc);
        f.u32(self.flags);
        f.u32(self.reserved1);
        f.u32(self.reserved2);
        f.u32(self.reserved3);
    }
}

/// One decoded section header of either width.
///
/// The width is fixed by the owning segment when the record is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionRecord {
    /// Owned by an `LC_SEGMENT` command.
    Narrow(Section32),
    /// Owned by an `LC_SEGMENT_64` command.
    Wide(Section64),
}

impl SectionRecord {
    pub fn variant(&self) -> Variant {
        match self {
            Self::Narrow(_) => Variant::Bits32,
            Self::Wide(_) => Variant::Bits64,
        }
    }

    pub fn is_wide(&self) -> bool {
        matches!(self, Self::Wide(_))
    }

    pub fn section_name(&self) -> &FixedName {
        match self {
            Self::Narrow(s) => &s.sectname,
            Self::Wide(s) => &s.sectname,
        }
    }

    pub fn segment_name(&self) -> &FixedName {
        match self {
            Self::Narrow(s) => &s.segname,
            Self::Wide(s) => &s.segname,
        }
    }

    /// Qualified name, `segment,section`.
    pub fn name(&self) -> String {
        format!("{},{}", self.segment_name(), self.section_name())
    }

    pub fn address(&self) -> u64 {
        match self {
            Self::Narrow(s) => s.addr.into(),
            Self::Wide(s) => s.addr,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            Self::Narrow(s) => s.size.into(),
            Self::Wide(s) => s.size,
        }
    }

    pub fn file_offset(&self) -> u64 {
        match self {
            Self::Narrow(s) => s.offset.into(),
            Self::Wide(s) => s.offset.into(),
        }
    }

    /// Alignment as a power-of-two exponent.
    pub fn alignment(&self) -> u32 {
        match self {
            Self::Narrow(s) => s.align,
            Self::Wide(s) => s.align,
        }
    }

    /// Alignment in bytes, or 0 if the exponent does not fit in a `u64`.
    pub fn align(&self) -> u64 {
        1u64.checked_shl(self.alignment()).unwrap_or(0)
    }

    pub fn reloc_offset(&self) -> u32 {
        match self {
            Self::Narrow(s) => s.reloff,
            Self::Wide(s) => s.reloff,
        }
    }

    pub fn reloc_count(&self) -> u32 {
        match self {
            Self::Narrow(s) => s.nreloc,
            Self::Wide(s) => s.nreloc,
        }
    }

    pub fn flags(&self) -> u32 {
        match self {
            Self::Narrow(s) => s.flags,
            Self::Wide(s) => s.flags,
        }
    }

    pub fn section_type(&self) -> u32 {
        self.flags() & SECTION_TYPE
    }

    pub fn attributes(&self) -> u32 {
        self.flags() & SECTION_ATTRIBUTES
    }

    /// Zero-fill sections occupy memory but have no bytes in the file.
    pub fn is_zerofill(&self) -> bool {
        matches!(
            self.section_type(),
            S_ZEROFILL | S_GB_ZEROFILL | S_THREAD_LOCAL_ZEROFILL
        )
    }

    pub fn reserved1(&self) -> u32 {
        match self {
            Self::Narrow(s) => s.reserved1,
            Self::Wide(s) => s.reserved1,
        }
    }

    pub fn reserved2(&self) -> u32 {
        match self {
            Self::Narrow(s) => s.reserved2,
            Self::Wide(s) => s.reserved2,
        }
    }
}

impl From<Section32> for SectionRecord {
    fn from(section: Section32) -> Self {
        Self::Narrow(section)
    }
}

impl From<Section64> for SectionRecord {
    fn from(section: Section64) -> Self {
        Self::Wide(section)
    }
}

/// `{}` prints the quoted qualified name; `{:#}` prints the verbose form.
impl fmt::Display for SectionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Name: {}", self.name())?;
            writeln!(f, "Size: 0x{:x}", self.size())?;
            writeln!(f, "Offset: 0x{:x}", self.file_offset())?;
            write!(f, "Address: 0x{:x}", self.address())
        } else {
            write!(f, "\"{}\"", self.name())
        }
    }
}
