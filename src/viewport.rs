use crate::cursor::Location;
use crate::pager::{Pager, ScreenLine};
use std::io::{Read, Seek};

/// The visible window onto a pager: the location of its first row, the row the cursor is
/// on, and how many rows tall it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub top: Location,
    pub cursor: usize,
    height: usize,
}

impl Viewport {
    pub fn new(top: Location, height: usize) -> Self {
        Self {
            top,
            cursor: 0,
            height: height.max(1),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Changes the number of rows, keeping the cursor on screen.
    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
        self.cursor = self.cursor.min(self.height - 1);
    }

    /// Scrolls by `lines` rows.
    ///
    /// With `move_cursor`, the cursor moves within the screen first. Whatever it cannot cover
    /// once pressed against the top or bottom row scrolls the view instead. Without it, as for
    /// paging, the view itself moves and the cursor stays on the same row. Neither the view
    /// top nor the cursor ever lands on `Eof`, and scrolling up past the first line stops at
    /// the first line.
    pub fn scroll_by<R: Read + Seek>(&mut self, pager: &mut Pager<R>, lines: i64, move_cursor: bool) {
        if !move_cursor {
            self.move_view(pager, lines, false);
            return;
        }

        let target = (self.cursor as i64).saturating_add(lines);
        let row = target.clamp(0, self.height as i64 - 1);
        if row as usize != self.cursor {
            if pager.move_by(self.top, row) == Location::Eof {
                return;
            }
            self.cursor = row as usize;
        }

        let rest = target - row;
        if rest != 0 {
            self.move_view(pager, rest, true);
        }
    }

    fn move_view<R: Read + Seek>(&mut self, pager: &mut Pager<R>, lines: i64, keep_cursor: bool) {
        match pager.move_by(self.top, lines) {
            loc @ Location::Data { .. } => {
                if keep_cursor && pager.move_by(loc, self.cursor as i64) == Location::Eof {
                    return;
                }
                self.top = loc;
            }
            Location::Start => {
                self.top = Location::new(0, 0);
                if !keep_cursor {
                    self.cursor = 0;
                }
            }
            Location::Eof => (),
        }
    }

    /// The location under the cursor.
    pub fn cursor_location<R: Read + Seek>(&self, pager: &mut Pager<R>) -> Location {
        pager.move_by(self.top, self.cursor as i64)
    }

    /// Renders every row of the view.
    pub fn render<R: Read + Seek>(&self, pager: &mut Pager<R>) -> Vec<ScreenLine> {
        (0..self.height)
            .map(|y| pager.render_line(self.top, y, self.cursor))
            .collect()
    }
}
