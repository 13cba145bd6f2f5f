//! Mach-O section table library.
//!
//! This library decodes the section headers stored after each segment load
//! command of a Mach-O image into one flat, stably indexed table.
//! It is organized into several modules:
//! - `config`: CLI configuration.
//! - `error`: The error type shared by every layer.
//! - `handle`: Seekable stream with a byte order, and its shared form.
//! - `layout`: Fixed-layout record descriptions and the generic decoder.
//! - `macho`: Container detection and the load-command walk.
//! - `segment`: Segment views consumed by the table builder.
//! - `section`: 32- and 64-bit section header records.
//! - `table`: The section table itself.
//! - `reference`: Index-based references into a table.

pub mod config;
pub mod error;
pub mod handle;
pub mod layout;
pub mod macho;
pub mod reference;
pub mod section;
pub mod segment;
pub mod table;
pub mod utils;

pub use error::{Error, Result};
pub use handle::{Handle, SharedHandle};
pub use reference::SectionReference;
pub use section::{Section32, Section64, SectionRecord};
pub use segment::{Segment, SegmentView, Variant};
pub use table::SectionTable;
