//! In-memory Mach-O images for the integration tests.

#![allow(dead_code)]

use object::endian::Endian;
use object::macho::{LC_SEGMENT, LC_SEGMENT_64, LC_UUID, MH_MAGIC, MH_MAGIC_64, MH_OBJECT};
use object::Endianness;
use sectab::layout::{FixedName, Layout};
use sectab::{Section32, Section64, SegmentView, Variant};

pub fn section32(segment: &str, section: &str, addr: u32, size: u32, offset: u32) -> Section32 {
    Section32 {
        sectname: FixedName::new(section),
        segname: FixedName::new(segment),
        addr,
        size,
        offset,
        align: 2,
        reloff: 0,
        nreloc: 0,
        flags: 0,
        reserved1: 0,
        reserved2: 0,
    }
}

pub fn section64(segment: &str, section: &str, addr: u64, size: u64, offset: u32) -> Section64 {
    Section64 {
        sectname: FixedName::new(section),
        segname: FixedName::new(segment),
        addr,
        size,
        offset,
        align: 4,
        reloff: 0,
        nreloc: 0,
        flags: 0,
        reserved1: 0,
        reserved2: 0,
        reserved3: 0,
    }
}

/// A segment view with explicit positions, independent of any load command.
pub struct View {
    pub position: u64,
    pub header_size: u64,
    pub count: u32,
    pub command: u32,
}

impl View {
    pub fn new(position: u64, header_size: u64, count: u32, variant: Variant) -> Self {
        Self {
            position,
            header_size,
            count,
            command: variant.command(),
        }
    }
}

impl SegmentView for View {
    fn header_position(&self) -> u64 {
        self.position
    }

    fn header_size(&self) -> u64 {
        self.header_size
    }

    fn section_count(&self) -> u32 {
        self.count
    }

    fn command(&self) -> u32 {
        self.command
    }
}

/// Writes `bytes` at `position`, growing `image` as needed.
pub fn put(image: &mut Vec<u8>, position: usize, bytes: &[u8]) {
    if image.len() < position + bytes.len() {
        image.resize(position + bytes.len(), 0);
    }
    image[position..position + bytes.len()].copy_from_slice(bytes);
}

enum Command {
    Segment32(String, Vec<Section32>),
    Segment64(String, Vec<Section64>),
    Other(u32, u32),
}

/// Assembles a thin Mach-O image: header, then load commands back to back.
pub struct ImageBuilder {
    endian: Endianness,
    variant: Variant,
    commands: Vec<Command>,
    trailer: Vec<u8>,
}

impl ImageBuilder {
    pub fn new(endian: Endianness, variant: Variant) -> Self {
        Self {
            endian,
            variant,
            commands: Vec::new(),
            trailer: Vec::new(),
        }
    }

    pub fn segment32(mut self, name: &str, sections: Vec<Section32>) -> Self {
        self.commands.push(Command::Segment32(name.to_string(), sections));
        self
    }

    pub fn segment64(mut self, name: &str, sections: Vec<Section64>) -> Self {
        self.commands.push(Command::Segment64(name.to_string(), sections));
        self
    }

    /// A non-segment command of `cmdsize` bytes.
    pub fn other(mut self, cmd: u32, cmdsize: u32) -> Self {
        self.commands.push(Command::Other(cmd, cmdsize));
        self
    }

    pub fn uuid(self) -> Self {
        self.other(LC_UUID, 24)
    }

    /// Bytes appended after the load commands.
    pub fn trailer(mut self, bytes: &[u8]) -> Self {
        self.trailer.extend_from_slice(bytes);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let e = self.endian;
        let mut commands = Vec::new();
        for command in &self.commands {
            match command {
                Command::Segment32(name, sections) => {
                    let cmdsize = Variant::Bits32.segment_header_size() as usize
                        + sections.len() * Section32::SIZE;
                    commands.extend(e.write_u32_bytes(LC_SEGMENT));
                    commands.extend(e.write_u32_bytes(cmdsize as u32));
                    commands.extend(FixedName::new(name).0);
                    for word in [0, 0x1000, 0, 0x1000, 7, 7, sections.len() as u32, 0] {
                        commands.extend(e.write_u32_bytes(word));
                    }
                    for section in sections {
                        commands.extend(section.to_bytes(e));
                    }
                }
                Command::Segment64(name, sections) => {
                    let cmdsize = Variant::Bits64.segment_header_size() as usize
                        + sections.len() * Section64::SIZE;
                    commands.extend(e.write_u32_bytes(LC_SEGMENT_64));
                    commands.extend(e.write_u32_bytes(cmdsize as u32));
                    commands.extend(FixedName::new(name).0);
                    for quad in [0, 0x1000, 0, 0x1000] {
                        commands.extend(e.write_u64_bytes(quad));
                    }
                    for word in [7, 7, sections.len() as u32, 0] {
                        commands.extend(e.write_u32_bytes(word));
                    }
                    for section in sections {
                        commands.extend(section.to_bytes(e));
                    }
                }
                Command::Other(cmd, cmdsize) => {
                    let mut raw = Vec::new();
                    raw.extend(e.write_u32_bytes(*cmd));
                    raw.extend(e.write_u32_bytes(*cmdsize));
                    raw.resize(*cmdsize as usize, 0);
                    commands.extend(raw);
                }
            }
        }

        let magic = match self.variant {
            Variant::Bits32 => MH_MAGIC,
            Variant::Bits64 => MH_MAGIC_64,
        };
        let mut image = Vec::new();
        for word in [
            magic,
            7,
            3,
            MH_OBJECT,
            self.commands.len() as u32,
            commands.len() as u32,
            0,
        ] {
            image.extend(e.write_u32_bytes(word));
        }
        if self.variant == Variant::Bits64 {
            image.extend_from_slice(&[0; 4]);
        }
        image.extend(commands);
        image.extend(self.trailer);
        image
    }
}
