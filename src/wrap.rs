//! Fixed-width soft wrapping of record text into display lines.

use crate::seq::Record;
use unicode_width::UnicodeWidthChar;

/// The narrowest width a record can be rendered at: one gutter cell and one base.
pub const MIN_WIDTH: usize = 2;

/// Cuts `text` into fragments of `width` terminal cells, padding the last one with spaces.
///
/// Cuts fall at every multiple of `width` with no regard for word boundaries. Text which fits
/// in `width` cells, including empty text, produces exactly one fragment. A wide character
/// which would straddle a cut is moved to the next fragment.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::with_capacity(text.len() / width + 1);

    let mut current = String::with_capacity(width);
    let mut cells = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if cells > 0 && cells + w > width {
            lines.push(pad(std::mem::take(&mut current), cells, width));
            cells = 0;
        }
        current.push(ch);
        cells += w;
    }
    lines.push(pad(current, cells, width));

    lines
}

fn pad(mut line: String, cells: usize, width: usize) -> String {
    line.extend(std::iter::repeat(' ').take(width.saturating_sub(cells)));
    line
}

/// Renders a record as display lines: the `@`-prefixed identifier wrapped to `width`, followed
/// by the sequence wrapped to `width - 1` behind a one cell gutter.
pub fn render_record(rec: &Record, width: usize) -> Vec<String> {
    let width = width.max(MIN_WIDTH);

    let mut lines = wrap(&format!("@{}", rec.id), width);
    lines.extend(
        wrap(&rec.seq, width - 1)
            .into_iter()
            .map(|line| format!(" {line}")),
    );
    lines
}
