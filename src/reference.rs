//! References to sections of a built table.

use std::fmt;
use std::ops::Deref;

use crate::section::SectionRecord;
use crate::table::SectionTable;

/// Names one section of a [`SectionTable`] by index.
///
/// Holds a borrow of the record the table stores rather than a copy, so a
/// reference always resolves to the table's own record and cannot outlive
/// the table.
pub struct SectionReference<'t, R> {
    table: &'t SectionTable<R>,
    record: &'t SectionRecord,
    index: usize,
}

impl<'t, R> SectionReference<'t, R> {
    /// Returns `None` if `index` is out of range.
    #[allow(clippy::should_implement_trait)]
    pub fn from(table: &'t SectionTable<R>, index: usize) -> Option<Self> {
        let record = table.get(index)?;
        Some(Self {
            table,
            record,
            index,
        })
    }

    pub fn dereference(&self) -> &'t SectionRecord {
        self.record
    }

    pub fn table(&self) -> &'t SectionTable<R> {
        self.table
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_wide(&self) -> bool {
        self.record.is_wide()
    }

    pub fn name(&self) -> String {
        self.record.name()
    }

    pub fn size(&self) -> u64 {
        self.record.size()
    }

    pub fn file_offset(&self) -> u64 {
        self.record.file_offset()
    }

    pub fn address(&self) -> u64 {
        self.record.address()
    }
}

impl<R> Clone for SectionReference<'_, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for SectionReference<'_, R> {}

impl<R> Deref for SectionReference<'_, R> {
    type Target = SectionRecord;

    fn deref(&self) -> &SectionRecord {
        self.record
    }
}

/// Two references are equal when they name the same slot of the same table.
impl<R> PartialEq for SectionReference<'_, R> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.table, other.table) && self.index == other.index
    }
}

impl<R> Eq for SectionReference<'_, R> {}

impl<R> fmt::Debug for SectionReference<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionReference")
            .field("index", &self.index)
            .field("record", self.record)
            .finish()
    }
}

impl<R> fmt::Display for SectionReference<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.record, f)
    }
}
