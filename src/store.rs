use crate::error::{Result, StoreError};
use crate::reader::FastqParser;
use crate::seq::{Direction, Record};
use lru::LruCache;
use std::fs::File;
use std::io::{Read, Seek};
use std::num::NonZeroUsize;
use std::path::Path;

/// Materialises FASTQ records from a stream strictly on demand.
///
/// Records are parsed front to back and are never read twice by the sequential scan. The
/// byte offset and orientation of every record seen so far are kept for the lifetime of the
/// store, but at most `cache_size` parsed records are held at once. A record which has been
/// evicted is parsed again from its saved offset the next time it is requested.
///
/// The number of records is unknown until the scan reaches the end of the stream, at which
/// point it is fixed and never grows again.
pub struct RecordStore<R> {
    parser: Option<FastqParser<R>>,
    /// starting byte offset of each materialised record
    offsets: Vec<u64>,
    directions: Vec<Direction>,
    cache: LruCache<usize, Record>,
    /// where the sequential scan continues from
    scan_offset: u64,
    total: Option<usize>,
    max_records: usize,
}

impl RecordStore<File> {
    /// Opens the file at `path`. Failing to open the file is reported here, rather than on the
    /// first read.
    pub fn open(path: impl AsRef<Path>, cache_size: usize, max_records: usize) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::new(file, cache_size, max_records))
    }
}

impl<R: Read + Seek> RecordStore<R> {
    pub fn new(reader: R, cache_size: usize, max_records: usize) -> Self {
        Self {
            parser: Some(FastqParser::new(reader)),
            offsets: Vec::new(),
            directions: Vec::new(),
            cache: LruCache::new(NonZeroUsize::new(cache_size).unwrap_or(NonZeroUsize::MIN)),
            scan_offset: 0,
            total: None,
            max_records,
        }
    }

    /// The number of records materialised so far.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// The total number of records, once the end of the stream has been seen.
    pub fn total_records(&self) -> Option<usize> {
        self.total
    }

    /// The number of parsed records currently held in memory.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    pub fn max_records(&self) -> usize {
        self.max_records
    }

    pub fn is_closed(&self) -> bool {
        self.parser.is_none()
    }

    /// Makes sure that record `index` has been materialised, reading further into the stream
    /// if needed.
    ///
    /// # Errors
    ///
    /// * `InvalidIndex` if `index` is negative
    /// * `CeilingExceeded` if `index` is at or beyond the record limit
    /// * `Exhausted` if the stream holds fewer than `index + 1` records
    /// * `Malformed` or `Io` if the stream could not be parsed. The records read up to that
    ///   point remain available and the stream is treated as ended.
    /// * `Closed` if more records are needed after `close` has been called
    pub fn ensure(&mut self, index: isize) -> Result<()> {
        let index = usize::try_from(index).map_err(|_| StoreError::InvalidIndex(index))?;

        if index >= self.max_records {
            return Err(StoreError::CeilingExceeded {
                index,
                max_records: self.max_records,
            });
        }
        if let Some(total) = self.total {
            if index >= total {
                return Err(StoreError::Exhausted { index, total });
            }
        }
        if index < self.offsets.len() {
            return Ok(());
        }

        let Some(parser) = self.parser.as_mut() else {
            return Err(StoreError::Closed);
        };

        // a re-fetch may have moved the stream elsewhere
        if let Err(e) = parser.seek_to(self.scan_offset) {
            error!("Could not resume reading at byte {}: {}", self.scan_offset, e);
            self.total = Some(self.offsets.len());
            return Err(e);
        }

        while self.offsets.len() <= index {
            match parser.next_record() {
                Ok(Some((offset, rec))) => {
                    self.offsets.push(offset);
                    self.directions.push(Direction::Forward);
                    self.cache.push(self.offsets.len() - 1, rec);
                    self.scan_offset = parser.position();
                }
                Ok(None) => {
                    let total = self.offsets.len();
                    info!("Reached the end of the file after {total} records");
                    self.total = Some(total);
                    return Err(StoreError::Exhausted { index, total });
                }
                Err(e) => {
                    error!("Stopped reading after {} records: {}", self.offsets.len(), e);
                    self.total = Some(self.offsets.len());
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Returns record `index`, materialising or re-parsing it as required.
    pub fn get(&mut self, index: usize) -> Result<&Record> {
        self.ensure(isize::try_from(index).unwrap_or(isize::MAX))?;

        let offset = self.offsets[index];
        let direction = self.directions[index];
        let parser = &mut self.parser;

        self.cache.try_get_or_insert(index, || -> Result<Record> {
            let parser = parser.as_mut().ok_or(StoreError::Closed)?;
            debug!("Re-reading record {index} from byte {offset}");

            let mut rec = parser.record_at(offset)?;
            if direction == Direction::Reverse {
                rec.reverse_complement();
            }
            Ok(rec)
        })
    }

    /// The orientation of record `index`, if it has been materialised. Never reads the stream.
    pub fn direction(&self, index: usize) -> Option<Direction> {
        self.directions.get(index).copied()
    }

    /// Replaces record `index` with its reverse complement. The change survives the record
    /// being evicted and re-read.
    pub fn reverse_complement(&mut self, index: usize) -> Result<()> {
        self.get(index)?;

        if let Some(rec) = self.cache.get_mut(&index) {
            rec.reverse_complement();
        }
        self.directions[index] = self.directions[index].flipped();

        Ok(())
    }

    /// Releases the underlying stream. Records which are still cached remain readable.
    /// Calling this more than once has no further effect.
    pub fn close(&mut self) {
        if self.parser.take().is_some() {
            debug!("Closed record stream after {} records", self.offsets.len());
        }
    }
}
