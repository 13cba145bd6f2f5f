//! Mach-O front end.
//!
//! Just enough of the container to feed the section table. The header and
//! load commands are parsed with `object::read::macho`, which bounds the walk
//! by `sizeofcmds` and rejects commands smaller than their own prefix. Only
//! the position of each segment command is tracked here, since the section
//! arrays are read through a [`crate::Handle`] afterwards. Universal (fat)
//! binaries are not handled.

use object::macho::{MachHeader32, MachHeader64, MH_CIGAM, MH_CIGAM_64, MH_MAGIC, MH_MAGIC_64};
use object::read::macho::{LoadCommandVariant, MachHeader};
use object::Endianness;
use std::mem;

use crate::error::{Error, Result};
use crate::segment::{Segment, Variant};

/// The segments of one thin Mach-O image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Byte order of every multi-byte field in the image.
    pub endian: Endianness,
    /// Width selected by the header magic.
    pub variant: Variant,
    /// Segment commands, in load-command order.
    pub segments: Vec<Segment>,
}

/// Maps the raw (little-endian) first word of an image to its width.
pub fn detect(magic: u32) -> Result<Variant> {
    match magic {
        MH_MAGIC | MH_CIGAM => Ok(Variant::Bits32),
        MH_MAGIC_64 | MH_CIGAM_64 => Ok(Variant::Bits64),
        other => Err(Error::BadMagic(other)),
    }
}

/// Identifies a Mach-O image and collects its segment commands.
pub fn parse(data: &[u8]) -> Result<Image> {
    let magic = data.get(..4).ok_or(Error::ShortRead {
        position: 0,
        expected: 4,
    })?;
    let magic = u32::from_le_bytes([magic[0], magic[1], magic[2], magic[3]]);

    let image = match detect(magic)? {
        Variant::Bits32 => walk::<MachHeader32<Endianness>>(data)?,
        Variant::Bits64 => walk::<MachHeader64<Endianness>>(data)?,
    };
    tracing::debug!(
        "Mach-O {:?} {:?} image, {} segments",
        image.endian,
        image.variant,
        image.segments.len()
    );
    Ok(image)
}

/// Walks the load commands after a header of type `Mach`.
///
/// A command's position is the header size plus the `cmdsize` of every
/// command before it.
fn walk<Mach>(data: &[u8]) -> Result<Image>
where
    Mach: MachHeader<Endian = Endianness>,
{
    let header = Mach::parse(data, 0)?;
    let endian = header.endian()?;
    let variant = if header.is_type_64() {
        Variant::Bits64
    } else {
        Variant::Bits32
    };

    let mut segments = Vec::new();
    let mut commands = header.load_commands(endian, data, 0)?;
    let mut position = mem::size_of::<Mach>() as u64;
    while let Some(command) = commands.next()? {
        match command.variant()? {
            LoadCommandVariant::Segment32(raw, _) => {
                let segment = Segment::from_command32(raw, endian, position);
                tracing::debug!("Segment {}", segment);
                segments.push(segment);
            }
            LoadCommandVariant::Segment64(raw, _) => {
                let segment = Segment::from_command64(raw, endian, position);
                tracing::debug!("Segment {}", segment);
                segments.push(segment);
            }
            _ => {
                tracing::trace!(
                    "Skipping load command 0x{:x} at 0x{:x}",
                    command.cmd(),
                    position
                );
            }
        }
        position += u64::from(command.cmdsize());
    }

    Ok(Image {
        endian,
        variant,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use object::macho::{LC_SEGMENT, LC_UUID};

    /// Encodes `words` in `endian` order.
    fn words(endian: Endianness, words: &[u32]) -> Vec<u8> {
        use object::endian::Endian;
        words.iter().flat_map(|&w| endian.write_u32_bytes(w)).collect()
    }

    fn header32(endian: Endianness, ncmds: u32, sizeofcmds: u32) -> Vec<u8> {
        words(endian, &[MH_MAGIC, 7, 3, 1, ncmds, sizeofcmds, 0])
    }

    #[test]
    fn detect_width() {
        assert_eq!(detect(MH_MAGIC).unwrap(), Variant::Bits32);
        assert_eq!(detect(MH_CIGAM).unwrap(), Variant::Bits32);
        assert_eq!(detect(MH_MAGIC_64).unwrap(), Variant::Bits64);
        assert_eq!(detect(MH_CIGAM_64).unwrap(), Variant::Bits64);
        assert!(matches!(detect(0x464c_457f), Err(Error::BadMagic(0x464c_457f))));
    }

    #[test]
    fn big_endian_segment() {
        let mut image = header32(Endianness::Big, 2, 24 + 56);
        image.extend(words(Endianness::Big, &[LC_UUID, 24, 0, 0, 0, 0]));
        image.extend(words(Endianness::Big, &[LC_SEGMENT, 56]));
        image.extend(b"__TEXT\0\0\0\0\0\0\0\0\0\0");
        image.extend(words(Endianness::Big, &[0x1000, 0x2000, 0, 0x2000, 7, 5, 0, 0]));

        let parsed = parse(&image).unwrap();
        assert_eq!(parsed.endian, Endianness::Big);
        assert_eq!(parsed.variant, Variant::Bits32);
        assert_eq!(parsed.segments.len(), 1);
        let text = &parsed.segments[0];
        assert_eq!(text.name.as_str(), "__TEXT");
        assert_eq!(text.position, 28 + 24);
        assert_eq!(text.vm_address, 0x1000);
        assert_eq!(text.vm_size, 0x2000);
    }

    #[test]
    fn zero_sized_command_is_rejected() {
        let mut image = header32(Endianness::Little, 1000, 56);
        image.extend(words(Endianness::Little, &[LC_SEGMENT, 0]));
        image.resize(28 + 56, 0);
        assert!(matches!(parse(&image), Err(Error::Parse(_))));
    }

    #[test]
    fn walk_stops_at_sizeofcmds() {
        // Two commands declared, but `sizeofcmds` only covers the first.
        let mut image = header32(Endianness::Little, 2, 24);
        image.extend(words(Endianness::Little, &[LC_UUID, 24, 0, 0, 0, 0]));
        image.extend(words(Endianness::Little, &[LC_UUID, 24, 0, 0, 0, 0]));
        assert!(matches!(parse(&image), Err(Error::Parse(_))));
    }

    #[test]
    fn commands_past_end_of_file() {
        let image = header32(Endianness::Little, 1, 56);
        assert!(matches!(parse(&image), Err(Error::Parse(_))));
    }

    #[test]
    fn empty_input() {
        assert!(matches!(
            parse(&[]),
            Err(Error::ShortRead { position: 0, expected: 4 })
        ));
    }
}
