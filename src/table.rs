//! Section table.
//!
//! Flattens the section headers of every segment into one list. The index of
//! a record in that list is its identity for the lifetime of the table; see
//! [`SectionReference`].

use std::fmt;
use std::io::{Read, Seek};

use crate::error::{Error, Result};
use crate::handle::SharedHandle;
use crate::reference::SectionReference;
use crate::section::{Section32, Section64, SectionRecord};
use crate::segment::{SegmentView, Variant};

pub struct SectionTable<R> {
    handle: SharedHandle<R>,
    sections: Vec<SectionRecord>,
}

impl<R: Read + Seek> SectionTable<R> {
    /// Decodes the section headers of `segments`.
    ///
    /// Records are ordered by segment, then by position within the segment's
    /// section array. Each array starts right after its segment's fixed
    /// header; nothing checks that the array stays inside the file or the
    /// load command. The handle is held for the whole build, and the first
    /// failure aborts it.
    pub fn build<V: SegmentView>(handle: &SharedHandle<R>, segments: &[V]) -> Result<Self> {
        let mut sections = Vec::new();
        {
            let mut stream = handle.acquire()?;
            for segment in segments {
                let variant = segment.variant()?;
                let position = segment.header_position();
                let size = segment.header_size();
                let start = position
                    .checked_add(size)
                    .ok_or(Error::PositionOverflow { position, size })?;
                let count = segment.section_count();
                tracing::debug!(
                    "Reading {} {:?} sections at 0x{:x}",
                    count,
                    variant,
                    start
                );

                stream.seek(start)?;
                for _ in 0..count {
                    let record = match variant {
                        Variant::Bits32 => SectionRecord::Narrow(stream.decode::<Section32>()?),
                        Variant::Bits64 => SectionRecord::Wide(stream.decode::<Section64>()?),
                    };
                    tracing::trace!("Section {} -> {}", sections.len(), record);
                    sections.push(record);
                }
            }
        }

        tracing::debug!(
            "Built section table with {} sections from {} segments",
            sections.len(),
            segments.len()
        );
        Ok(Self {
            handle: handle.clone(),
            sections,
        })
    }

    /// Reads the file contents of the section at `index`.
    ///
    /// Zero-fill sections have no file contents and yield an empty buffer.
    /// Returns `Ok(None)` for an out-of-range index.
    pub fn section_data(&self, index: usize) -> Result<Option<Vec<u8>>> {
        let Some(record) = self.sections.get(index) else {
            return Ok(None);
        };
        if record.is_zerofill() {
            return Ok(Some(Vec::new()));
        }

        let mut stream = self.handle.acquire()?;
        stream.seek(record.file_offset())?;
        stream.read(record.size()).map(Some)
    }
}

impl<R> SectionTable<R> {
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SectionRecord> {
        self.sections.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SectionRecord> {
        self.sections.iter()
    }

    pub fn reference(&self, index: usize) -> Option<SectionReference<'_, R>> {
        SectionReference::from(self, index)
    }

    /// First section named `segment,section`, in table order.
    pub fn find(&self, segment: &str, section: &str) -> Option<SectionReference<'_, R>> {
        let index = self.sections.iter().position(|record| {
            record.segment_name().as_bytes() == segment.as_bytes()
                && record.section_name().as_bytes() == section.as_bytes()
        })?;
        self.reference(index)
    }

    /// The handle the table was decoded from.
    pub fn handle(&self) -> &SharedHandle<R> {
        &self.handle
    }
}

impl<'t, R> IntoIterator for &'t SectionTable<R> {
    type Item = &'t SectionRecord;
    type IntoIter = std::slice::Iter<'t, SectionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}

impl<R> fmt::Display for SectionTable<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Sections ({}):", self.sections.len())?;
        for record in &self.sections {
            writeln!(f, "  {}", record)?;
        }
        Ok(())
    }
}
