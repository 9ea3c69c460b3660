//! A pager for FASTQ files too large to load into memory.
//!
//! Records are read only as far as the view has reached ([`store::RecordStore`]), rendered
//! into fixed-width display lines ([`wrap`]), and addressed by record and display line
//! ([`cursor::Location`]). [`pager::Pager`] ties these together for a presentation layer.

#[macro_use]
extern crate log;

pub mod config;
pub mod cursor;
pub mod error;
pub mod pager;
pub mod readahead;
pub mod reader;
pub mod seq;
pub mod store;
pub mod viewport;
pub mod wrap;

pub use config::PagerConfig;
pub use cursor::Location;
pub use error::StoreError;
pub use pager::Pager;
pub use seq::{Direction, Record};
pub use store::RecordStore;
pub use viewport::Viewport;
