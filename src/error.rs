use thiserror::Error;

/// Failures raised while materialising records.
///
/// `Exhausted` is the ordinary end-of-file condition and is expected during scrolling;
/// `InvalidIndex` and `CeilingExceeded` indicate a caller asked for something it should not.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record index {0} is negative")]
    InvalidIndex(isize),

    #[error("record index {index} exceeds the limit of {max_records} records")]
    CeilingExceeded { index: usize, max_records: usize },

    #[error("record index {index} is past the end of the file ({total} records)")]
    Exhausted { index: usize, total: usize },

    #[error("record starting at byte {offset} is truncated: missing the {missing} line")]
    Malformed { offset: u64, missing: &'static str },

    #[error("the record stream has been closed")]
    Closed,

    #[error("could not read records: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
