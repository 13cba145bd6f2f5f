//! Stream handle.
//!
//! A [`Handle`] pairs a seekable reader with the byte order of the image it
//! reads. It has exactly one cursor, so anything that seeks and then reads
//! must own it for the duration. [`SharedHandle`] makes that explicit: the
//! handle lives behind a mutex and is acquired without blocking, so a second
//! concurrent user gets [`Error::HandleInUse`] instead of a moved cursor.

use object::Endianness;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use crate::error::{Error, Result};
use crate::layout::{FieldReader, Layout};

/// A seekable byte stream and the byte order of the image it holds.
pub struct Handle<R> {
    /// The underlying medium; its cursor is the handle's only state.
    inner: R,
    /// Byte order used by [`Handle::decode`].
    endian: Endianness,
}

impl<R: Read + Seek> Handle<R> {
    /// Wraps `inner`, decoding multi-byte fields in `endian` order.
    pub fn new(inner: R, endian: Endianness) -> Self {
        Self { inner, endian }
    }

    /// Byte order of the image.
    pub fn endian(&self) -> Endianness {
        self.endian
    }

    /// Moves the cursor to the absolute `position`.
    pub fn seek(&mut self, position: u64) -> Result<()> {
        self.inner
            .seek(SeekFrom::Start(position))
            .map_err(|source| Error::SeekFailure { position, source })?;
        Ok(())
    }

    /// Current cursor position.
    pub fn position(&mut self) -> Result<u64> {
        self.inner.stream_position().map_err(Error::Position)
    }

    /// Reads exactly `count` bytes from the current position.
    ///
    /// The buffer grows with the data actually read, so a bogus `count` from
    /// a malformed image fails with [`Error::ShortRead`] rather than a huge
    /// up-front allocation.
    pub fn read(&mut self, count: u64) -> Result<Vec<u8>> {
        let position = self.position()?;
        let mut buf = Vec::new();
        let read = (&mut self.inner)
            .take(count)
            .read_to_end(&mut buf)
            .map_err(|source| Error::Read { position, source })?;
        if (read as u64) < count {
            return Err(Error::ShortRead {
                position,
                expected: count,
            });
        }
        Ok(buf)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let position = self.position()?;
        let expected = buf.len() as u64;
        self.inner.read_exact(buf).map_err(|source| match source.kind() {
            io::ErrorKind::UnexpectedEof => Error::ShortRead { position, expected },
            _ => Error::Read { position, source },
        })
    }

    /// Decodes one `L` record at the current position.
    pub fn decode<L: Layout>(&mut self) -> Result<L> {
        let mut buf = vec![0u8; L::SIZE];
        self.read_exact(&mut buf)?;
        let mut fields = FieldReader::new(&buf, self.endian, L::FIELDS);
        Ok(L::decode(&mut fields))
    }

    pub fn share(self) -> SharedHandle<R> {
        SharedHandle(Arc::new(Mutex::new(self)))
    }
}

/// A [`Handle`] shared between the segment layer and the tables built on it.
pub struct SharedHandle<R>(Arc<Mutex<Handle<R>>>);

impl<R> SharedHandle<R> {
    /// Takes the cursor for one complete operation.
    ///
    /// Fails with [`Error::HandleInUse`] while another guard is alive. A
    /// poisoned lock is recovered: every operation seeks before it reads, so
    /// a cursor left behind by a panic is harmless.
    pub fn acquire(&self) -> Result<MutexGuard<'_, Handle<R>>> {
        match self.0.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::Poisoned(poisoned)) => Ok(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => Err(Error::HandleInUse),
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<R> Clone for SharedHandle<R> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}
