use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_WIDTH: usize = 80;
pub const DEFAULT_CACHE_SIZE: usize = 1000;
pub const DEFAULT_READAHEAD: usize = 50;
pub const DEFAULT_MAX_RECORDS: usize = 100_000;

/// Settings for a pager session. Missing fields in a config file take their defaults.
///
/// # Fields
///
/// * `width` - The terminal width, in cells, including the 9 cell gutter
/// * `cache_size` - The number of parsed records (and wrapped records) kept in memory
/// * `readahead` - How many records past the viewport the background reader keeps
///   materialised. 0 disables the background reader.
/// * `max_records` - The hard limit on how far into a file the pager will read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagerConfig {
    pub width: usize,
    pub cache_size: usize,
    pub readahead: usize,
    pub max_records: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            cache_size: DEFAULT_CACHE_SIZE,
            readahead: DEFAULT_READAHEAD,
            max_records: DEFAULT_MAX_RECORDS,
        }
    }
}

impl PagerConfig {
    /// Loads a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Unable to open config file {}", path.display()))?;

        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Invalid config file {}", path.display()))
    }
}
