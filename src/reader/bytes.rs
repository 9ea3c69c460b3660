use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};

/// A buffered reader which keeps track of how many bytes have been consumed, so that the
/// start of every line can be recorded and seeked back to later.
pub struct ByteReader<R> {
    reader: BufReader<R>,
    position: u64,
}

impl<R: Read> ByteReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            position: 0,
        }
    }

    /// The byte offset of the next unread byte.
    pub fn position(&self) -> u64 {
        self.position
    }

    // modified from https://doc.rust-lang.org/src/std/io/mod.rs.html#1910-1936
    // Returns Ok(None) if EOF was reached before any byte could be read
    pub fn apply_on_slice_until_byte<F>(&mut self, delim: u8, mut f: F) -> std::io::Result<Option<usize>>
    where
        F: FnMut(&[u8]),
    {
        let mut read = 0;
        loop {
            let (done, used) = {
                let available = self.reader.fill_buf()?;

                match memchr::memchr(delim, available) {
                    Some(i) => {
                        f(&available[..i]);
                        (true, i + 1)
                    }
                    None => {
                        f(available);
                        (false, available.len())
                    }
                }
            };

            self.reader.consume(used);
            self.position += used as u64;
            read += used;

            if done {
                return Ok(Some(read));
            } else if used == 0 {
                return Ok(if read == 0 { None } else { Some(read) });
            }
        }
    }

    /// Reads a line into `buf`, without its `\n` or `\r\n` terminator. A final line without
    /// a terminator is still returned.
    pub fn read_line_trim_newline(&mut self, buf: &mut Vec<u8>) -> std::io::Result<Option<usize>> {
        buf.clear();
        let read = self.apply_on_slice_until_byte(b'\n', |x| buf.extend_from_slice(x))?;
        if read.is_some() && buf.last() == Some(&b'\r') {
            buf.pop();
        }
        Ok(read)
    }

    /// Skips past the next `\n`. Returns `Ok(None)` at EOF.
    pub fn seek_until_byte(&mut self, delim: u8) -> std::io::Result<Option<usize>> {
        self.apply_on_slice_until_byte(delim, |_| ())
    }
}

impl<R: Read + Seek> ByteReader<R> {
    /// Moves to an absolute byte offset, discarding anything buffered.
    pub fn seek_to(&mut self, offset: u64) -> std::io::Result<()> {
        if offset != self.position {
            self.position = self.reader.seek(SeekFrom::Start(offset))?;
        }
        Ok(())
    }
}
