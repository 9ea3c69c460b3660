use super::bytes::ByteReader;
use crate::error::{Result, StoreError};
use crate::seq::Record;
use std::io::{Read, Seek};

/// Parses four-line FASTQ records one at a time from a seekable stream.
///
/// Each record is laid out as
///   1. a framing character (normally `@`) followed by the identifier
///   2. the sequence
///   3. a separator, which is ignored
///   4. the quality string
///
/// An identifier line which is missing, or empty once the framing character is removed,
/// marks the end of the records.
pub struct FastqParser<R> {
    bytes: ByteReader<R>,
    line: Vec<u8>,
}

impl<R: Read + Seek> FastqParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: ByteReader::new(reader),
            line: Vec::with_capacity(256),
        }
    }

    pub fn position(&self) -> u64 {
        self.bytes.position()
    }

    /// Parses the record at the current position, returning it with the byte offset it
    /// started at. Returns `Ok(None)` at the end of the records.
    pub fn next_record(&mut self) -> Result<Option<(u64, Record)>> {
        let offset = self.bytes.position();

        let Some(id) = self.next_line()? else {
            return Ok(None);
        };
        // drop the framing character
        let id: String = id.chars().skip(1).collect();
        if id.is_empty() {
            return Ok(None);
        }

        let seq = self
            .next_line()?
            .ok_or(StoreError::Malformed { offset, missing: "sequence" })?;

        // line 3: separator, contents are irrelevant
        if self.bytes.seek_until_byte(b'\n')?.is_none() {
            return Err(StoreError::Malformed { offset, missing: "separator" });
        }

        let qual = self
            .next_line()?
            .ok_or(StoreError::Malformed { offset, missing: "quality" })?;

        Ok(Some((offset, Record::new(id, seq, qual))))
    }

    /// Parses the single record which starts at `offset`. The stream is left positioned
    /// after that record.
    pub fn record_at(&mut self, offset: u64) -> Result<Record> {
        self.bytes.seek_to(offset)?;
        match self.next_record()? {
            Some((_, rec)) => Ok(rec),
            None => Err(StoreError::Malformed { offset, missing: "identifier" }),
        }
    }

    /// Moves the stream to `offset` so the next call to `next_record` starts there.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        Ok(self.bytes.seek_to(offset)?)
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        match self.bytes.read_line_trim_newline(&mut self.line)? {
            Some(_) => Ok(Some(String::from_utf8_lossy(&self.line).into_owned())),
            None => Ok(None),
        }
    }
}
