pub mod dna;

/// Orientation of a record relative to how it appears in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }

    /// The marker shown next to each display line of a record.
    pub fn arrow(self) -> char {
        match self {
            Direction::Forward => '→',
            Direction::Reverse => '←',
        }
    }
}

/// A single parsed FASTQ entry.
///
/// # Fields
///
/// * `id` - The identifier, without the leading `@`
/// * `seq` - The bases, in whatever case the file used
/// * `qual` - The quality string, one code per base
/// * `direction` - Whether `seq`/`qual` have been reverse complemented
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: String,
    pub seq: String,
    pub qual: String,
    pub direction: Direction,
}

impl Record {
    pub fn new(id: impl Into<String>, seq: impl Into<String>, qual: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            seq: seq.into(),
            qual: qual.into(),
            direction: Direction::Forward,
        }
    }

    /// Replaces this record with its reverse complement. The sequence is reversed and
    /// complemented, the quality string is reversed, and the direction is flipped.
    /// Applying this twice restores the original record.
    pub fn reverse_complement(&mut self) {
        self.seq = dna::revcomp(&self.seq);
        self.qual = self.qual.chars().rev().collect();
        self.direction = self.direction.flipped();
    }
}
