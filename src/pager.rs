use crate::config::PagerConfig;
use crate::cursor::{self, LineSource, Location};
use crate::error::StoreError;
use crate::readahead::{lock, ReadAhead, SharedStore};
use crate::seq::Direction;
use crate::store::RecordStore;
use crate::wrap::{render_record, MIN_WIDTH};
use lru::LruCache;
use std::fs::File;
use std::io::{Read, Seek};
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Cells to the left of the content: a 6 cell record number and a 3 cell direction marker.
pub const GUTTER_WIDTH: usize = 9;

/// One row of the screen, ready to be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLine {
    pub text: String,
    pub location: Location,
    /// whether this row is the one under the cursor
    pub active: bool,
}

/// Scrollable, soft-wrapped view of a FASTQ file.
///
/// Records are read from the `RecordStore` as the view reaches them and are rendered into
/// display lines `width` cells wide. Rendered records are cached until the width changes or
/// the record itself is reverse complemented.
pub struct Pager<R> {
    store: SharedStore<R>,
    wraps: LruCache<usize, Vec<String>>,
    width: usize,
    readahead: Option<ReadAhead>,
    ceiling_reported: bool,
}

impl Pager<File> {
    /// Opens `path` with the settings in `config`, starting the read-ahead worker if the
    /// config asks for one.
    pub fn open(path: impl AsRef<Path>, config: &PagerConfig) -> Result<Self, StoreError> {
        let store = RecordStore::open(path, config.cache_size, config.max_records)?;
        let mut pager = Pager::new(store, config);
        if config.readahead > 0 {
            pager.start_readahead(config.readahead)?;
        }
        Ok(pager)
    }
}

impl<R: Read + Seek> Pager<R> {
    /// Creates a pager over `store` with no read-ahead. `config.width` is the full terminal
    /// width, including the gutter.
    pub fn new(store: RecordStore<R>, config: &PagerConfig) -> Self {
        let mut pager = Self {
            store: Arc::new(Mutex::new(store)),
            wraps: LruCache::new(NonZeroUsize::new(config.cache_size).unwrap_or(NonZeroUsize::MIN)),
            width: MIN_WIDTH,
            readahead: None,
            ceiling_reported: false,
        };
        pager.resize(config.width);
        pager
    }

    /// The width records are wrapped to, excluding the gutter.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Sets the width records are wrapped to. Every cached rendering is dropped if the width
    /// actually changes; the records themselves are kept.
    pub fn set_width(&mut self, width: usize) {
        let width = if width < MIN_WIDTH {
            warn!("Width {width} is too narrow, using {MIN_WIDTH}");
            MIN_WIDTH
        } else {
            width
        };

        if width != self.width {
            debug!("Width changed from {} to {}, dropping {} rendered records", self.width, width, self.wraps.len());
            self.width = width;
            self.wraps.clear();
        }
    }

    /// Adapts to a new terminal width, leaving room for the gutter.
    pub fn resize(&mut self, terminal_width: usize) {
        self.set_width(terminal_width.saturating_sub(GUTTER_WIDTH));
    }

    /// Moves `loc` by `delta` display lines. See `cursor::move_by`.
    pub fn move_by(&mut self, loc: Location, delta: i64) -> Location {
        let new_loc = cursor::move_by(self, loc, delta);
        if let (Some(readahead), Location::Data { record, .. }) = (&self.readahead, new_loc) {
            readahead.request(record);
        }
        new_loc
    }

    /// The display line at `loc`, exactly `width` cells wide. `None` for the `Start` and `Eof`
    /// sentinels, or a location which does not exist.
    pub fn render_segment(&mut self, loc: Location) -> Option<&str> {
        let Location::Data { record, line } = loc else {
            return None;
        };
        self.wrapped(record)?.get(line).map(String::as_str)
    }

    /// Replaces record `record` with its reverse complement, or restores it if it was already
    /// reversed. Only that record's rendering is invalidated.
    pub fn reverse_complement(&mut self, record: usize) -> Result<(), StoreError> {
        lock(&self.store).reverse_complement(record)?;
        self.wraps.pop(&record);
        Ok(())
    }

    /// The orientation of a record that has already been read.
    pub fn direction(&self, record: usize) -> Option<Direction> {
        lock(&self.store).direction(record)
    }

    /// The number of records read so far.
    pub fn records_read(&self) -> usize {
        lock(&self.store).len()
    }

    pub fn total_records(&self) -> Option<usize> {
        lock(&self.store).total_records()
    }

    /// Composes screen row `y` of a view whose first row is `top`, marking it active if it
    /// is row `cursor_row`.
    pub fn render_line(&mut self, top: Location, y: usize, cursor_row: usize) -> ScreenLine {
        let loc = self.move_by(top, y as i64);
        let full_width = self.width + GUTTER_WIDTH;

        let text = match loc {
            Location::Start => " ".repeat(full_width),
            Location::Eof => format!(
                "{}~ EOF ~{}",
                " ".repeat(GUTTER_WIDTH),
                " ".repeat(self.width.saturating_sub(7))
            ),
            Location::Data { record, .. } => {
                let arrow = self.direction(record).unwrap_or_default().arrow();
                let segment = self.render_segment(loc).unwrap_or_default();
                format!("{record:>6} {arrow} {segment}")
            }
        };

        let active = loc.is_data() && self.move_by(top, cursor_row as i64) == loc;
        ScreenLine {
            text,
            location: loc,
            active,
        }
    }

    /// Stops the read-ahead worker and closes the file. Calling this again does nothing.
    pub fn close(&mut self) {
        self.readahead.take();
        lock(&self.store).close();
    }

    #[cfg(test)]
    fn is_rendered(&self, record: usize) -> bool {
        self.wraps.contains(&record)
    }

    fn wrapped(&mut self, record: usize) -> Option<&[String]> {
        let width = self.width;
        let store = &self.store;

        let result = self.wraps.try_get_or_insert(record, || -> Result<_, StoreError> {
            let mut store = lock(store);
            let rec = store.get(record)?;
            Ok(render_record(rec, width))
        });

        match result {
            Ok(lines) => Some(lines.as_slice()),
            Err(StoreError::Exhausted { .. }) => None,
            Err(e @ StoreError::CeilingExceeded { .. }) => {
                if !self.ceiling_reported {
                    warn!("{e}; showing it as the end of the file");
                    self.ceiling_reported = true;
                }
                None
            }
            Err(e) => {
                debug!("Record {record} is unavailable: {e}");
                None
            }
        }
    }
}

impl<R: Read + Seek + Send + 'static> Pager<R> {
    /// Starts a worker which keeps `distance` records read ahead of wherever the pager last
    /// moved to.
    pub fn start_readahead(&mut self, distance: usize) -> Result<(), StoreError> {
        self.readahead = Some(ReadAhead::spawn(Arc::clone(&self.store), distance)?);
        Ok(())
    }
}

impl<R: Read + Seek> LineSource for Pager<R> {
    fn line_count(&mut self, record: usize) -> Option<usize> {
        self.wrapped(record).map(<[String]>::len)
    }

    fn total_records(&mut self) -> Option<usize> {
        lock(&self.store).total_records()
    }
}

impl<R> Drop for Pager<R> {
    fn drop(&mut self) {
        // the worker holds a handle to the store, so stop it before the store goes away
        self.readahead.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    /// Builds a pager over records with the given sequence lengths, wrapping to `width`.
    fn pager(seq_lens: &[usize], width: usize) -> Pager<Cursor<Vec<u8>>> {
        let mut out = Vec::new();
        for (i, n) in seq_lens.iter().enumerate() {
            let seq = "ACGT".chars().cycle().take(*n).collect::<String>();
            writeln!(out, "@r{i}\n{seq}\n+\n{}", "I".repeat(*n)).unwrap();
        }
        let config = PagerConfig {
            width: width + GUTTER_WIDTH,
            readahead: 0,
            ..PagerConfig::default()
        };
        Pager::new(RecordStore::new(Cursor::new(out), 100, 1000), &config)
    }

    #[test]
    fn two_record_file() {
        // width 10: record 0 is the identifier plus 2 sequence lines, record 1 is 2 lines
        let mut p = pager(&[18, 5], 10);
        assert_eq!(p.move_by(Location::new(0, 0), 4), Location::new(1, 1));
        assert_eq!(p.move_by(Location::new(1, 1), 100), Location::Eof);
        assert_eq!(p.move_by(Location::new(0, 0), -1), Location::Start);
        assert_eq!(p.total_records(), Some(2));
    }

    #[test]
    fn reads_lazily() {
        let mut p = pager(&[4; 50], 10);
        assert_eq!(p.move_by(Location::new(0, 0), 5), Location::new(2, 1));
        assert_eq!(p.records_read(), 3);
        assert_eq!(p.total_records(), None);
    }

    #[test]
    fn segments() {
        let mut p = pager(&[12], 6);
        assert_eq!(p.render_segment(Location::new(0, 0)), Some("@r0   "));
        assert_eq!(p.render_segment(Location::new(0, 3)), Some(" GT   "));
        assert_eq!(p.render_segment(Location::new(0, 4)), None);
        assert_eq!(p.render_segment(Location::Start), None);
        assert_eq!(p.render_segment(Location::Eof), None);
        assert_eq!(p.render_segment(Location::new(1, 0)), None);
    }

    #[test]
    fn width_change_rewraps() {
        let mut p = pager(&[12, 12], 6);
        assert_eq!(p.move_by(Location::new(0, 0), 4), Location::new(1, 0));

        p.set_width(13);
        assert_eq!(p.width(), 13);
        assert_eq!(p.render_segment(Location::new(0, 1)), Some(" ACGTACGTACGT"));
        assert_eq!(p.move_by(Location::new(0, 0), 2), Location::new(1, 0));

        p.set_width(0);
        assert_eq!(p.width(), MIN_WIDTH);
    }

    #[test]
    fn revcomp_rerenders_one_record() {
        let mut p = pager(&[3, 3], 10);
        assert_eq!(p.render_segment(Location::new(1, 1)), Some(" ACG      "));
        assert_eq!(p.render_segment(Location::new(0, 1)), Some(" ACG      "));
        assert!(p.is_rendered(0));
        assert!(p.is_rendered(1));

        p.reverse_complement(0).unwrap();
        assert_eq!(p.direction(0), Some(Direction::Reverse));
        assert_eq!(p.direction(1), Some(Direction::Forward));
        assert!(!p.is_rendered(0));
        assert!(p.is_rendered(1));

        assert_eq!(p.render_segment(Location::new(0, 1)), Some(" CGT      "));
        assert_eq!(p.render_segment(Location::new(1, 1)), Some(" ACG      "));

        p.reverse_complement(1).unwrap();
        p.reverse_complement(1).unwrap();
        assert_eq!(p.direction(1), Some(Direction::Forward));
    }

    #[test]
    fn revcomp_changes_rendering() {
        let mut out = Vec::new();
        writeln!(out, "@x\nAACG\n+\nABCD").unwrap();
        let mut p = Pager::new(
            RecordStore::new(Cursor::new(out), 10, 10),
            &PagerConfig::default(),
        );
        p.set_width(6);

        assert_eq!(p.render_segment(Location::new(0, 1)), Some(" AACG "));
        p.reverse_complement(0).unwrap();
        assert_eq!(p.render_segment(Location::new(0, 1)), Some(" CGTT "));
        assert!(matches!(p.reverse_complement(3), Err(StoreError::Exhausted { .. })));
    }

    #[test]
    fn screen_lines() {
        let mut p = pager(&[3], 6);
        let top = Location::new(0, 0);

        let first = p.render_line(top, 0, 1);
        assert_eq!(first.text, "     0 → @r0   ");
        assert!(!first.active);

        let second = p.render_line(top, 1, 1);
        assert_eq!(second.text, "     0 →  ACG  ");
        assert!(second.active);

        let eof = p.render_line(top, 2, 1);
        assert_eq!(eof.location, Location::Eof);
        assert_eq!(eof.text, "         ~ EOF ~");
        assert!(!eof.active);

        let blank = p.render_line(Location::Start, 0, 0);
        assert_eq!(blank.text, " ".repeat(15));

        p.reverse_complement(0).unwrap();
        assert_eq!(p.render_line(top, 1, 0).text, "     0 ←  CGT  ");
    }

    #[test]
    fn ceiling_reads_as_eof() {
        let mut out = Vec::new();
        for i in 0..10 {
            writeln!(out, "@r{i}\nA\n+\nI").unwrap();
        }
        let mut p = Pager::new(
            RecordStore::new(Cursor::new(out), 10, 3),
            &PagerConfig::default(),
        );
        assert_eq!(p.move_by(Location::new(0, 0), 5), Location::new(2, 1));
        assert_eq!(p.move_by(Location::new(0, 0), 6), Location::Eof);
        assert_eq!(p.total_records(), None);
    }

    #[test]
    fn readahead_runs_in_background() {
        let mut out = Vec::new();
        for i in 0..200 {
            writeln!(out, "@r{i}\nACGT\n+\nIIII").unwrap();
        }
        let mut p = Pager::new(
            RecordStore::new(Cursor::new(out), 1000, 1000),
            &PagerConfig::default(),
        );
        p.start_readahead(50).unwrap();

        assert_eq!(p.move_by(Location::new(0, 0), 21), Location::new(10, 1));
        // closing joins the worker, after which its reads are visible
        p.close();
        assert!(p.records_read() >= 61);
        p.close();
    }

    #[test]
    fn open_missing_file() {
        let result = Pager::open("file_which_does_not_exist.fastq", &PagerConfig::default());
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}
