//! Fixed-layout record descriptions.
//!
//! The section header records describe themselves with a static field
//! table: the name, byte width and order of each field. One generic
//! routine ([`crate::handle::Handle::decode`]) reads `SIZE` bytes and walks
//! the table through a [`FieldReader`]; [`Layout::encode`] walks it the other
//! way through a [`FieldWriter`].

use object::endian::{Endian, Endianness};
use std::borrow::Cow;
use std::fmt;

/// Width of the fixed name fields in segment and section headers.
pub const NAME_LEN: usize = 16;

/// One entry of a record's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub width: usize,
}

impl Field {
    pub const fn new(name: &'static str, width: usize) -> Self {
        Self { name, width }
    }
}

/// Sums the widths of a field table.
pub const fn fields_size(fields: &[Field]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < fields.len() {
        total += fields[i].width;
        i += 1;
    }
    total
}

/// A record with a fixed binary layout.
///
/// `decode` and `encode` must visit the fields in the order and with the
/// widths listed in `FIELDS`.
pub trait Layout: Sized {
    /// Field table, in on-disk order.
    const FIELDS: &'static [Field];

    /// Total byte size of one record.
    const SIZE: usize = fields_size(Self::FIELDS);

    fn decode(fields: &mut FieldReader<'_>) -> Self;

    fn encode(&self, fields: &mut FieldWriter<'_>);

    /// Decodes a record from the front of `data`, or `None` if it is too short.
    fn from_bytes(data: &[u8], endian: Endianness) -> Option<Self> {
        let data = data.get(..Self::SIZE)?;
        Some(Self::decode(&mut FieldReader::new(data, endian, Self::FIELDS)))
    }

    fn to_bytes(&self, endian: Endianness) -> Vec<u8> {
        let mut out = Vec::with_capacity(Self::SIZE);
        self.encode(&mut FieldWriter::new(&mut out, endian, Self::FIELDS));
        out
    }
}

/// Cursor over the raw bytes of one record, driven by its field table.
pub struct FieldReader<'a> {
    data: &'a [u8],
    endian: Endianness,
    fields: std::slice::Iter<'static, Field>,
}

impl<'a> FieldReader<'a> {
    pub fn new(data: &'a [u8], endian: Endianness, fields: &'static [Field]) -> Self {
        Self {
            data,
            endian,
            fields: fields.iter(),
        }
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let field = self.fields.next();
        debug_assert_eq!(field.map(|f| f.width), Some(N), "field table out of sync");
        let (head, rest) = self.data.split_at(N);
        self.data = rest;
        let mut raw = [0u8; N];
        raw.copy_from_slice(head);
        raw
    }

    pub fn name(&mut self) -> FixedName {
        FixedName(self.take::<NAME_LEN>())
    }

    pub fn u32(&mut self) -> u32 {
        let raw = self.take::<4>();
        self.endian.read_u32_bytes(raw)
    }

    pub fn u64(&mut self) -> u64 {
        let raw = self.take::<8>();
        self.endian.read_u64_bytes(raw)
    }
}

/// Appends the fields of one record to a buffer, driven by its field table.
pub struct FieldWriter<'a> {
    out: &'a mut Vec<u8>,
    endian: Endianness,
    fields: std::slice::Iter<'static, Field>,
}

impl<'a> FieldWriter<'a> {
    pub fn new(out: &'a mut Vec<u8>, endian: Endianness, fields: &'static [Field]) -> Self {
        Self {
            out,
            endian,
            fields: fields.iter(),
        }
    }

    fn put(&mut self, bytes: &[u8]) {
        let field = self.fields.next();
        debug_assert_eq!(field.map(|f| f.width), Some(bytes.len()), "field table out of sync");
        self.out.extend_from_slice(bytes);
    }

    pub fn name(&mut self, name: &FixedName) {
        self.put(&name.0);
    }

    pub fn u32(&mut self, value: u32) {
        let raw = self.endian.write_u32_bytes(value);
        self.put(&raw);
    }

    pub fn u64(&mut self, value: u64) {
        let raw = self.endian.write_u64_bytes(value);
        self.put(&raw);
    }
}

/// A 16-byte, NUL-padded name field.
///
/// The field is not NUL-terminated when the name uses all 16 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FixedName(pub [u8; NAME_LEN]);

impl FixedName {
    /// Builds a name field, truncating to 16 bytes.
    pub fn new(name: &str) -> Self {
        let mut raw = [0u8; NAME_LEN];
        let len = name.len().min(NAME_LEN);
        raw[..len].copy_from_slice(&name.as_bytes()[..len]);
        Self(raw)
    }

    /// The bytes before the first NUL.
    pub fn as_bytes(&self) -> &[u8] {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        &self.0[..end]
    }

    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }
}

impl fmt::Debug for FixedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl fmt::Display for FixedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}
